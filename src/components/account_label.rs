use crate::address::shorten;
use crate::controller::{ConnectionState, Identity};
use crate::hooks::UseEthereumHandle;
use yew::prelude::*;

/// Tooltip for the connected indicator: the ENS name, or the shortened address.
pub fn account_title(state: &ConnectionState) -> String {
    match state.identity() {
        Some(Identity::Name(name)) => name.clone(),
        Some(Identity::Address(address)) => shorten(address),
        None => String::new(),
    }
}

#[function_component]
pub fn AccountLabel() -> Html {
    let ethereum = use_context::<UseEthereumHandle>().expect(
        "no ethereum provider found. you must wrap your components in an <EthereumContextProvider/>",
    );

    html! {
        <div>
            <span title={account_title(ethereum.state())}>{"Wallet Connected"}</span>
        </div>
    }
}
