use std::cell::{OnceCell, RefCell};

use log::{debug, info, warn};
use web3::types::Address;

use crate::address::to_checksum;
use crate::config::{ModalOptions, NetworkConfig};
use crate::error::{ConnectError, ConnectResult};
use crate::provider::{AccountSigner, ConnectionHandle, NetworkProvider};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    /// A connection attempt is suspended on the wallet or the node.
    Connecting,
    Connected,
}

/// What the page greets the user with: the ENS name, or the address when none resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Name(String),
    Address(String),
}

impl Identity {
    pub fn from_lookup(address: &Address, name: Option<String>) -> Self {
        match name {
            Some(name) if !name.is_empty() => Identity::Name(name),
            _ => Identity::Address(to_checksum(address)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identity::Name(name) => name,
            Identity::Address(address) => address,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    phase: ConnectionPhase,
    identity: Option<Identity>,
}

impl ConnectionState {
    pub fn connected(identity: Identity) -> Self {
        Self {
            phase: ConnectionPhase::Connected,
            identity: Some(identity),
        }
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn is_connected(&self) -> bool {
        self.phase == ConnectionPhase::Connected
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn resolved_name(&self) -> Option<&str> {
        match &self.identity {
            Some(Identity::Name(name)) => Some(name),
            _ => None,
        }
    }

    pub fn display_address(&self) -> Option<&str> {
        match &self.identity {
            Some(Identity::Address(address)) => Some(address),
            _ => None,
        }
    }

    /// Name if resolved, else address, else empty.
    pub fn display_name(&self) -> &str {
        self.identity.as_ref().map(Identity::as_str).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// This call established the connection.
    Connected,
    /// Nothing to do, a previous call already connected.
    AlreadyConnected,
    /// Another call is still in flight; this one did nothing.
    Pending,
}

/// Owns the wallet handle and the connection state for one page.
pub struct ConnectionController<H> {
    network: NetworkConfig,
    options: ModalOptions,
    factory: Box<dyn Fn(&ModalOptions) -> H>,
    handle: OnceCell<H>,
    state: RefCell<ConnectionState>,
}

impl<H: ConnectionHandle> ConnectionController<H> {
    pub fn new(network: NetworkConfig, factory: impl Fn(&ModalOptions) -> H + 'static) -> Self {
        let options = ModalOptions::for_network(&network);
        Self {
            network,
            options,
            factory: Box::new(factory),
            handle: OnceCell::new(),
            state: RefCell::new(ConnectionState::default()),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    fn handle(&self) -> &H {
        self.handle.get_or_init(|| {
            info!("creating wallet handle with {}", self.options.to_json());
            (self.factory)(&self.options)
        })
    }

    /// Mount-time entry point: builds the handle and connects unless already connected.
    pub async fn initialize(&self) -> ConnectResult<ConnectOutcome> {
        if self.state.borrow().is_connected() {
            return Ok(ConnectOutcome::AlreadyConnected);
        }
        self.handle();
        self.connect_and_identify().await
    }

    /// Connects, checks the network and resolves the account's identity.
    ///
    /// On failure the state goes back to [`ConnectionPhase::Disconnected`]
    /// and the error is returned for the caller to report.
    pub async fn connect_and_identify(&self) -> ConnectResult<ConnectOutcome> {
        {
            let mut state = self.state.borrow_mut();
            match state.phase {
                ConnectionPhase::Connected => return Ok(ConnectOutcome::AlreadyConnected),
                ConnectionPhase::Connecting => {
                    debug!("connection attempt already in flight");
                    return Ok(ConnectOutcome::Pending);
                }
                ConnectionPhase::Disconnected => state.phase = ConnectionPhase::Connecting,
            }
        }

        let result = identify(self.handle(), &self.network).await;

        let mut state = self.state.borrow_mut();
        match result {
            Ok(identity) => {
                info!("wallet connected as {}", identity.as_str());
                *state = ConnectionState::connected(identity);
                Ok(ConnectOutcome::Connected)
            }
            Err(err) => {
                state.phase = ConnectionPhase::Disconnected;
                Err(err)
            }
        }
    }
}

async fn identify<H: ConnectionHandle>(
    handle: &H,
    network: &NetworkConfig,
) -> ConnectResult<Identity> {
    let connection = handle.connect().await?;
    let provider = H::Provider::from(connection);

    let chain_id = provider.chain_id().await?;
    if chain_id != network.chain_id {
        warn!(
            "wallet is on chain {}, switch to {}",
            chain_id,
            network.label()
        );
        return Err(ConnectError::WrongNetwork {
            expected: network.chain_id,
            actual: chain_id,
        });
    }

    let address = provider.signer().address().await?;
    let name = provider.lookup_address(address).await?;
    Ok(Identity::from_lookup(&address, name))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::join;

    use super::*;
    use crate::components::heading;

    const ADDRESS: &str = "0xABCabcABCabcABCabcABCabcABCabcABCabcABCa";

    #[derive(Default)]
    struct Calls {
        built: Cell<usize>,
        connect: Cell<usize>,
        chain_id: Cell<usize>,
        address: Cell<usize>,
        lookup: Cell<usize>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
    }

    fn bump(counter: &Cell<usize>) {
        counter.set(counter.get() + 1);
    }

    #[derive(Clone)]
    struct Script {
        declined: bool,
        chain_id: u64,
        name: ConnectResult<Option<String>>,
        calls: Rc<Calls>,
    }

    impl Script {
        fn new(chain_id: u64, name: ConnectResult<Option<String>>) -> Self {
            Self {
                declined: false,
                chain_id,
                name,
                calls: Rc::new(Calls::default()),
            }
        }

        fn controller(&self) -> ConnectionController<MockHandle> {
            let script = self.clone();
            ConnectionController::new(NetworkConfig::goerli(), move |options| {
                assert_eq!(options.network, "goerli");
                assert!(!options.disable_injected_provider);
                bump(&script.calls.built);
                MockHandle(script.clone())
            })
        }
    }

    fn address() -> Address {
        Address::from_slice(&hex::decode(&ADDRESS[2..]).unwrap())
    }

    struct MockHandle(Script);
    struct MockConnection(Script);
    struct MockProvider(Script);
    struct MockSigner(Script);

    impl From<MockConnection> for MockProvider {
        fn from(connection: MockConnection) -> Self {
            MockProvider(connection.0)
        }
    }

    #[async_trait(?Send)]
    impl ConnectionHandle for MockHandle {
        type Connection = MockConnection;
        type Provider = MockProvider;

        async fn connect(&self) -> ConnectResult<MockConnection> {
            bump(&self.0.calls.connect);
            let gate = self.0.calls.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.0.declined {
                return Err(ConnectError::Declined("User rejected the request.".into()));
            }
            Ok(MockConnection(self.0.clone()))
        }
    }

    #[async_trait(?Send)]
    impl NetworkProvider for MockProvider {
        type Signer = MockSigner;

        async fn chain_id(&self) -> ConnectResult<u64> {
            bump(&self.0.calls.chain_id);
            Ok(self.0.chain_id)
        }

        fn signer(&self) -> MockSigner {
            MockSigner(self.0.clone())
        }

        async fn lookup_address(&self, queried: Address) -> ConnectResult<Option<String>> {
            bump(&self.0.calls.lookup);
            assert_eq!(queried, address());
            self.0.name.clone()
        }
    }

    #[async_trait(?Send)]
    impl AccountSigner for MockSigner {
        async fn address(&self) -> ConnectResult<Address> {
            bump(&self.0.calls.address);
            Ok(address())
        }
    }

    fn assert_exclusive(state: &ConnectionState) {
        assert!(!(state.resolved_name().is_some() && state.display_address().is_some()));
    }

    #[test]
    fn test_initial_state() {
        let script = Script::new(5, Ok(None));
        let controller = script.controller();
        let state = controller.state();
        assert_eq!(state.phase(), ConnectionPhase::Disconnected);
        assert_eq!(state.resolved_name(), None);
        assert_eq!(state.display_address(), None);
        assert_eq!(state.display_name(), "");
        assert_eq!(script.calls.built.get(), 0);
    }

    #[test]
    fn test_resolved_name() {
        let script = Script::new(5, Ok(Some("punk.eth".into())));
        let controller = script.controller();

        assert_eq!(
            block_on(controller.initialize()),
            Ok(ConnectOutcome::Connected)
        );
        let state = controller.state();
        assert!(state.is_connected());
        assert_eq!(state.resolved_name(), Some("punk.eth"));
        assert_eq!(state.display_address(), None);
        assert_eq!(state.display_name(), "punk.eth");
        assert_exclusive(&state);
    }

    #[test]
    fn test_heading_after_initialize() {
        let script = Script::new(5, Ok(Some("punk.eth".into())));
        let controller = script.controller();

        block_on(controller.initialize()).unwrap();
        assert_eq!(
            heading(&controller.state()),
            "Welcome to LearnWeb3 Punks punk.eth!"
        );
    }

    #[test]
    fn test_address_when_no_name() {
        let script = Script::new(5, Ok(None));
        let controller = script.controller();

        block_on(controller.initialize()).unwrap();
        let state = controller.state();
        assert!(state.is_connected());
        assert_eq!(state.resolved_name(), None);
        assert_eq!(state.display_address(), Some(to_checksum(&address()).as_str()));
        assert!(state
            .display_address()
            .unwrap()
            .eq_ignore_ascii_case(ADDRESS));
        assert_exclusive(&state);
    }

    #[test]
    fn test_empty_name_counts_as_none() {
        let script = Script::new(5, Ok(Some(String::new())));
        let controller = script.controller();

        block_on(controller.initialize()).unwrap();
        let state = controller.state();
        assert_eq!(state.resolved_name(), None);
        assert!(state.display_address().is_some());
    }

    #[test]
    fn test_wrong_network_stops_before_account() {
        let script = Script::new(1, Ok(Some("punk.eth".into())));
        let controller = script.controller();

        let err = block_on(controller.initialize()).unwrap_err();
        assert_eq!(
            err,
            ConnectError::WrongNetwork {
                expected: 5,
                actual: 1
            }
        );
        assert!(err.user_message().is_some());

        let state = controller.state();
        assert_eq!(state.phase(), ConnectionPhase::Disconnected);
        assert_eq!(state.identity(), None);
        assert_eq!(script.calls.chain_id.get(), 1);
        assert_eq!(script.calls.address.get(), 0);
        assert_eq!(script.calls.lookup.get(), 0);
    }

    #[test]
    fn test_declined_prompt() {
        let mut script = Script::new(5, Ok(None));
        script.declined = true;
        let controller = script.controller();

        let err = block_on(controller.initialize()).unwrap_err();
        assert!(matches!(err, ConnectError::Declined(_)));
        assert!(err.user_message().is_none());
        assert!(!controller.state().is_connected());
        assert_eq!(script.calls.chain_id.get(), 0);
        assert_eq!(script.calls.address.get(), 0);
        assert_eq!(script.calls.lookup.get(), 0);
    }

    #[test]
    fn test_resolution_error() {
        let script = Script::new(5, Err(ConnectError::Resolution("execution reverted".into())));
        let controller = script.controller();

        let err = block_on(controller.connect_and_identify()).unwrap_err();
        assert!(matches!(err, ConnectError::Resolution(_)));
        let state = controller.state();
        assert!(!state.is_connected());
        assert_eq!(state.identity(), None);
    }

    #[test]
    fn test_second_call_when_connected_is_noop() {
        let script = Script::new(5, Ok(Some("punk.eth".into())));
        let controller = script.controller();

        block_on(controller.initialize()).unwrap();
        let before = controller.state();

        assert_eq!(
            block_on(controller.connect_and_identify()),
            Ok(ConnectOutcome::AlreadyConnected)
        );
        assert_eq!(
            block_on(controller.initialize()),
            Ok(ConnectOutcome::AlreadyConnected)
        );
        assert_eq!(controller.state(), before);
        assert_eq!(script.calls.connect.get(), 1);
    }

    #[test]
    fn test_handle_built_once_across_retries() {
        let mut script = Script::new(5, Ok(None));
        script.declined = true;
        let controller = script.controller();

        assert!(block_on(controller.initialize()).is_err());
        assert!(block_on(controller.initialize()).is_err());
        assert!(block_on(controller.connect_and_identify()).is_err());
        assert_eq!(script.calls.built.get(), 1);
        assert_eq!(script.calls.connect.get(), 3);
    }

    #[test]
    fn test_retry_after_wrong_network_is_allowed() {
        let script = Script::new(1, Ok(None));
        let controller = script.controller();
        assert!(block_on(controller.initialize()).is_err());
        assert!(block_on(controller.connect_and_identify()).is_err());
        assert_eq!(script.calls.connect.get(), 2);
        assert_eq!(script.calls.chain_id.get(), 2);
    }

    #[test]
    fn test_concurrent_trigger_is_pending() {
        let script = Script::new(5, Ok(Some("punk.eth".into())));
        let (release, gate) = oneshot::channel();
        *script.calls.gate.borrow_mut() = Some(gate);
        let controller = script.controller();

        let (mount, click) = block_on(join(controller.initialize(), async {
            let outcome = controller.connect_and_identify().await;
            let _ = release.send(());
            outcome
        }));

        assert_eq!(mount, Ok(ConnectOutcome::Connected));
        assert_eq!(click, Ok(ConnectOutcome::Pending));
        assert_eq!(script.calls.connect.get(), 1);
        assert_eq!(controller.state().resolved_name(), Some("punk.eth"));
    }
}
