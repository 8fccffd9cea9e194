use crate::types::Coin;
use sp_runtime::DispatchError;

/// Escrow ledger the marketplace parks deposits in.
pub trait DepositLedger<AccountId> {
	/// Moves `coin` from `who`'s spendable funds into escrow.
	fn add_deposit(who: &AccountId, coin: &Coin) -> Result<(), DispatchError>;

	/// Releases `coin` from `who`'s escrow back to them.
	fn subtract_deposit(who: &AccountId, coin: &Coin) -> Result<(), DispatchError>;

	/// Pays `coin` out of `from`'s escrow to `to`.
	fn send_deposit(from: &AccountId, to: &AccountId, coin: &Coin) -> Result<(), DispatchError>;

	fn deposit_of(who: &AccountId) -> Option<Coin>;
}
