use alloy::primitives::{Bytes, B256, U256};

use crate::domain::{
    Account, BalanceAndHistory, ContractRef, SignatureMethod, SignatureResult, TxRequest,
    TypedField, MINT_METHOD, SIGN_MESSAGE,
};
use crate::error::DappError;
use crate::ports::{ExplorerPort, PortError, RpcPort, WalletPort};
use crate::session::{SessionView, SessionWatcher};
use crate::validation::{parse_address, parse_token_amount};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DappCommand {
    EnableExtension,
    SignMessage,
    Transfer {
        to: String,
        amount: String,
    },
    ExecuteMint {
        contract: String,
        receiver: String,
        amount: String,
    },
    QueryBalanceAndHistory,
}

impl DappCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EnableExtension => "enable_extension",
            Self::SignMessage => "sign_message",
            Self::Transfer { .. } => "transfer",
            Self::ExecuteMint { .. } => "execute_mint",
            Self::QueryBalanceAndHistory => "balance_and_history",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Enabled(Account),
    Signed(SignatureResult),
    Submitted(B256),
    BalanceAndHistory(BalanceAndHistory),
}

/// A signature request resolved against the detected vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignRequest {
    TypedData {
        fields: Vec<TypedField>,
        signer: Account,
    },
    Message {
        message: String,
        signer: Account,
    },
}

impl SignRequest {
    pub fn method(&self) -> SignatureMethod {
        match self {
            Self::TypedData { .. } => SignatureMethod::EthSignTypedData,
            Self::Message { .. } => SignatureMethod::PersonalSign,
        }
    }

    pub fn into_result(self, signature: Bytes) -> SignatureResult {
        let method = self.method();
        SignatureResult {
            message: SIGN_MESSAGE.to_owned(),
            method,
            signature,
        }
    }
}

/// Runs page actions against the wallet client and its query sub-clients.
pub struct DappController<W, R, E>
where
    W: WalletPort,
    R: RpcPort,
    E: ExplorerPort,
{
    pub wallet: W,
    pub rpc: R,
    pub explorer: E,
    contract_abi: String,
}

impl<W, R, E> DappController<W, R, E>
where
    W: WalletPort,
    R: RpcPort,
    E: ExplorerPort,
{
    pub fn new(wallet: W, rpc: R, explorer: E, contract_abi: impl Into<String>) -> Self {
        Self {
            wallet,
            rpc,
            explorer,
            contract_abi: contract_abi.into(),
        }
    }

    pub fn contract_abi(&self) -> &str {
        &self.contract_abi
    }

    pub fn mount(&self) -> Result<(SessionWatcher, SessionView), PortError> {
        let watcher = SessionWatcher::mount(&self.wallet)?;
        let view = SessionView::probe(&self.wallet);
        tracing::info!(
            state = ?view.state,
            extension = view.extension_name().unwrap_or("none"),
            "session mounted"
        );
        Ok((watcher, view))
    }

    pub fn poll(&self, watcher: &SessionWatcher, view: &mut SessionView) -> Result<usize, PortError> {
        watcher.poll(&self.wallet, view)
    }

    pub fn unmount(&self, watcher: &mut SessionWatcher) -> Result<(), PortError> {
        watcher.unmount(&self.wallet)
    }

    pub fn handle(
        &self,
        session: &SessionView,
        command: DappCommand,
    ) -> Result<CommandOutcome, DappError> {
        let kind = command.kind();
        let result = match command {
            DappCommand::EnableExtension => self.enable(session).map(CommandOutcome::Enabled),
            DappCommand::SignMessage => self.sign(session).map(CommandOutcome::Signed),
            DappCommand::Transfer { to, amount } => self
                .transfer(session, &to, &amount)
                .map(CommandOutcome::Submitted),
            DappCommand::ExecuteMint {
                contract,
                receiver,
                amount,
            } => self
                .mint(session, &contract, &receiver, &amount)
                .map(CommandOutcome::Submitted),
            DappCommand::QueryBalanceAndHistory => self
                .balance_and_history(session)
                .map(CommandOutcome::BalanceAndHistory),
        };
        match &result {
            Ok(_) => tracing::info!(command = kind, "command completed"),
            Err(e) => tracing::warn!(command = kind, error = %e, "command failed"),
        }
        result
    }

    pub fn enable(&self, session: &SessionView) -> Result<Account, DappError> {
        if !session.installed {
            return Err(DappError::ExtensionNotInstalled);
        }
        self.wallet
            .enable_extension()
            .map_err(DappError::from_enable)
    }

    pub fn prepare_sign(&self, session: &SessionView) -> Result<SignRequest, DappError> {
        let signer = require_unlocked(session)?;
        let supports_typed = session
            .extension
            .as_ref()
            .is_some_and(|ext| ext.supports_typed_data());
        Ok(if supports_typed {
            SignRequest::TypedData {
                fields: vec![TypedField::string("Message", SIGN_MESSAGE)],
                signer,
            }
        } else {
            SignRequest::Message {
                message: SIGN_MESSAGE.to_owned(),
                signer,
            }
        })
    }

    pub fn sign(&self, session: &SessionView) -> Result<SignatureResult, DappError> {
        let request = self.prepare_sign(session)?;
        let signature = match &request {
            SignRequest::TypedData { fields, signer } => {
                self.wallet.sign_typed_data(fields, signer.address)
            }
            SignRequest::Message { message, signer } => {
                self.wallet.sign_message(message, signer.address)
            }
        }
        .map_err(DappError::from_sign)?;
        Ok(request.into_result(signature))
    }

    pub fn prepare_transfer(
        &self,
        session: &SessionView,
        to: &str,
        amount: &str,
    ) -> Result<TxRequest, DappError> {
        let from = require_unlocked(session)?;
        let to = parse_address(to)?;
        let value = self.parse_ether(amount)?;
        Ok(TxRequest {
            from: from.address,
            to: Some(to),
            value,
            data: None,
        })
    }

    pub fn prepare_mint(
        &self,
        session: &SessionView,
        contract: &str,
        receiver: &str,
        amount: &str,
    ) -> Result<TxRequest, DappError> {
        let from = require_unlocked(session)?;
        let contract = parse_address(contract)?;
        let receiver = parse_address(receiver)?;
        let amount = parse_token_amount(amount)?;

        let contract_ref = ContractRef {
            address: contract,
            abi_json: &self.contract_abi,
        };
        let params = self
            .wallet
            .execute_contract(
                &contract_ref,
                MINT_METHOD,
                &[receiver.to_string(), amount.to_string()],
            )
            .map_err(|e| DappError::ContractCallBuildFailed(e.to_string()))?;

        let base = TxRequest {
            from: from.address,
            to: None,
            value: self.parse_ether("0")?,
            data: None,
        };
        Ok(base.merged_with(params))
    }

    pub fn transfer(&self, session: &SessionView, to: &str, amount: &str) -> Result<B256, DappError> {
        let tx = self.prepare_transfer(session, to, amount)?;
        self.submit(&tx)
    }

    pub fn mint(
        &self,
        session: &SessionView,
        contract: &str,
        receiver: &str,
        amount: &str,
    ) -> Result<B256, DappError> {
        let tx = self.prepare_mint(session, contract, receiver, amount)?;
        self.submit(&tx)
    }

    fn submit(&self, tx: &TxRequest) -> Result<B256, DappError> {
        tracing::info!(from = %tx.from, to = ?tx.to, value = %tx.value, "submitting transaction");
        self.wallet
            .send_transaction(tx)
            .map_err(DappError::from_submit)
    }

    fn parse_ether(&self, amount: &str) -> Result<U256, DappError> {
        self.wallet
            .parse_ether(amount.trim())
            .map_err(|e| DappError::invalid_amount(amount, e))
    }

    /// Account the balance/history query runs for. The network may be unknown.
    pub fn query_account(&self, session: &SessionView) -> Result<Account, DappError> {
        if !session.installed {
            return Err(DappError::ExtensionNotInstalled);
        }
        if !session.is_enabled() {
            return Err(DappError::ExtensionNotEnabled);
        }
        session.account.ok_or(DappError::NoAccount)
    }

    pub fn balance_and_history(
        &self,
        session: &SessionView,
    ) -> Result<BalanceAndHistory, DappError> {
        let account = self.query_account(session)?;

        let balance = self
            .rpc
            .get_balance(account.address)
            .map_err(|e| DappError::Query(e.to_string()))?;
        tracing::debug!(address = %account.address, %balance, "Balance");

        let history = self
            .explorer
            .get_history(account.address)
            .map_err(|e| DappError::Query(e.to_string()))?;
        tracing::debug!(address = %account.address, txs = ?history, "TX History");

        Ok(BalanceAndHistory {
            address: account.address,
            balance,
            history,
        })
    }
}

fn require_unlocked(session: &SessionView) -> Result<Account, DappError> {
    if !session.installed {
        return Err(DappError::ExtensionNotInstalled);
    }
    if !session.is_enabled() {
        return Err(DappError::ExtensionNotEnabled);
    }
    if !session.network.is_known() {
        return Err(DappError::NetworkNotConnected);
    }
    session.account.ok_or(DappError::NoAccount)
}
