use log::warn;
use yew::prelude::*;

use super::ConnectButton;
use crate::controller::ConnectionState;
use crate::hooks::UseEthereumHandle;

const TITLE: &str = "ENS Dapp";
const GREETING: &str = "Welcome to LearnWeb3 Punks";
const DESCRIPTION: &str = "Its an NFT collection for LearnWeb3 Punks.";
const IMAGE: &str = "./learnweb3punks.png";
const FOOTER: &str = "Made with \u{2764} by LearnWeb3 Punks";

pub fn heading(state: &ConnectionState) -> String {
    format!("{} {}!", GREETING, state.display_name())
}

#[function_component]
pub fn Home() -> Html {
    let ethereum = use_context::<UseEthereumHandle>();

    use_effect_with_deps(
        |_| {
            match web_sys::window().and_then(|window| window.document()) {
                Some(document) => document.set_title(TITLE),
                None => warn!("no document, title not set"),
            }
            || ()
        },
        (),
    );

    let state = ethereum
        .as_ref()
        .map(|ethereum| ethereum.state().clone())
        .unwrap_or_default();

    html! {
        <div>
            <div class="main">
                <div>
                    <h1 class="title">{heading(&state)}</h1>
                    <div class="description">{DESCRIPTION}</div>
                    <ConnectButton />
                </div>
                <div>
                    <img class="image" src={IMAGE} />
                </div>
            </div>
            <footer class="footer">{FOOTER}</footer>
        </div>
    }
}
