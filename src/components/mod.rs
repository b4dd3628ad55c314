mod account_label;
mod connect_button;
mod ethereum_provider;
mod home;

pub use account_label::{account_title, AccountLabel};
pub use connect_button::ConnectButton;
pub use ethereum_provider::EthereumContextProvider;
pub use home::{heading, Home};

use log::{error, warn};

use crate::error::ConnectError;

/// Logs a failed connection and alerts for the ones the user has to act on.
pub(crate) fn report_failure(err: ConnectError) {
    error!("wallet connection failed: {}", err);
    let message = match err.user_message() {
        Some(message) => message,
        None => return,
    };
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.alert_with_message(&message) {
            warn!("alert failed: {:?}", err);
        }
    }
}
