use yew::prelude::*;
use yew_ens_dapp::components::{EthereumContextProvider, Home};

#[function_component]
fn App() -> Html {
    html! {
        <EthereumContextProvider>
            <Home />
        </EthereumContextProvider>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    yew::Renderer::<App>::new().render();
}
