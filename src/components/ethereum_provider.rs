use yew::prelude::*;

use super::report_failure;
use crate::hooks::{use_ethereum, UseEthereumHandle};

#[derive(Properties, PartialEq)]
pub struct EthereumContextProviderProps {
    #[prop_or_default]
    pub children: Children,
}

/// Owns the wallet connection and connects once on mount.
#[function_component]
pub fn EthereumContextProvider(props: &EthereumContextProviderProps) -> Html {
    let ethereum = use_ethereum();

    {
        let ethereum = ethereum.clone();
        use_effect_with_deps(
            move |_| {
                ethereum.initialize(Callback::from(report_failure));
                || ()
            },
            (),
        );
    }

    html! {
        <ContextProvider<UseEthereumHandle> context={ethereum}>
            {props.children.clone()}
        </ContextProvider<UseEthereumHandle>>
    }
}
