use std::rc::Rc;

use log::debug;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::config::NetworkConfig;
use crate::controller::{ConnectOutcome, ConnectionState};
use crate::error::{ConnectError, ConnectResult};
use crate::ethereum::{browser_controller, BrowserController};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Trigger {
    Mount,
    Click,
}

#[derive(Clone)]
pub struct UseEthereumHandle {
    controller: Rc<BrowserController>,
    state: UseStateHandle<ConnectionState>,
}

impl PartialEq for UseEthereumHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller) && *self.state == *other.state
    }
}

impl UseEthereumHandle {
    pub fn connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Runs the mount-time connection. Failures go to `on_error`.
    pub fn initialize(&self, on_error: Callback<ConnectError>) {
        self.spawn(Trigger::Mount, on_error);
    }

    /// Runs a user-initiated connection. Failures go to `on_error`.
    pub fn connect(&self, on_error: Callback<ConnectError>) {
        self.spawn(Trigger::Click, on_error);
    }

    fn spawn(&self, trigger: Trigger, on_error: Callback<ConnectError>) {
        let controller = Rc::clone(&self.controller);
        let state = self.state.clone();
        spawn_local(async move {
            let result: ConnectResult<ConnectOutcome> = match trigger {
                Trigger::Mount => controller.initialize().await,
                Trigger::Click => controller.connect_and_identify().await,
            };
            state.set(controller.state());
            match result {
                Ok(outcome) => debug!("{:?} connection: {:?}", trigger, outcome),
                Err(err) => on_error.emit(err),
            }
        });
    }
}

#[hook]
pub fn use_ethereum() -> UseEthereumHandle {
    let controller = use_state(|| Rc::new(browser_controller(NetworkConfig::goerli())));
    let state = use_state(ConnectionState::default);

    UseEthereumHandle {
        controller: Rc::clone(&*controller),
        state,
    }
}
