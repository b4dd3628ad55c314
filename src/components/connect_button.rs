use yew::prelude::*;

use super::{report_failure, AccountLabel};
use crate::hooks::UseEthereumHandle;

#[function_component]
pub fn ConnectButton() -> Html {
    let ethereum = use_context::<UseEthereumHandle>().expect(
        "no ethereum provider found. you must wrap your components in an <EthereumContextProvider/>",
    );

    if ethereum.connected() {
        return html! { <AccountLabel /> };
    }

    let onclick = {
        let ethereum = ethereum.clone();
        Callback::from(move |_: MouseEvent| ethereum.connect(Callback::from(report_failure)))
    };

    html! {
        <button {onclick} class="button">
            {"Connect your wallet"}
        </button>
    }
}
