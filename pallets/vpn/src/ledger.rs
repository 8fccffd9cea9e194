//! [`DepositLedger`] backed by reserved balances of a [`ReservableCurrency`].

use crate::{pallet::Error, traits::DepositLedger, types::Coin, Config, LOG_TARGET};
use frame_support::{
	ensure,
	traits::{ExistenceRequirement, Get, ReservableCurrency},
};
use sp_runtime::{traits::Zero, DispatchError, SaturatedConversion};
use sp_std::{marker::PhantomData, vec::Vec};

/// Escrows deposits by reserving the native currency. Only coins of
/// `NativeDenom` are accepted.
pub struct ReservedDeposits<T, C, NativeDenom>(PhantomData<(T, C, NativeDenom)>);

impl<T, C, NativeDenom> ReservedDeposits<T, C, NativeDenom>
where
	T: Config,
	C: ReservableCurrency<T::AccountId>,
	NativeDenom: Get<Vec<u8>>,
{
	fn native_amount(coin: &Coin) -> Result<C::Balance, DispatchError> {
		ensure!(coin.denom == NativeDenom::get(), Error::<T>::InvalidDepositDenom);
		Ok(coin.amount.saturated_into())
	}

	fn ensure_escrowed(who: &T::AccountId, amount: C::Balance) -> Result<(), DispatchError> {
		ensure!(C::reserved_balance(who) >= amount, Error::<T>::InsufficientDepositFunds);
		Ok(())
	}
}

impl<T, C, NativeDenom> DepositLedger<T::AccountId> for ReservedDeposits<T, C, NativeDenom>
where
	T: Config,
	C: ReservableCurrency<T::AccountId>,
	NativeDenom: Get<Vec<u8>>,
{
	fn add_deposit(who: &T::AccountId, coin: &Coin) -> Result<(), DispatchError> {
		let amount = Self::native_amount(coin)?;
		C::reserve(who, amount)
	}

	fn subtract_deposit(who: &T::AccountId, coin: &Coin) -> Result<(), DispatchError> {
		let amount = Self::native_amount(coin)?;
		Self::ensure_escrowed(who, amount)?;

		let missing = C::unreserve(who, amount);
		ensure!(missing.is_zero(), Error::<T>::InsufficientDepositFunds);
		Ok(())
	}

	fn send_deposit(
		from: &T::AccountId,
		to: &T::AccountId,
		coin: &Coin,
	) -> Result<(), DispatchError> {
		let amount = Self::native_amount(coin)?;
		Self::ensure_escrowed(from, amount)?;

		let missing = C::unreserve(from, amount);
		ensure!(missing.is_zero(), Error::<T>::InsufficientDepositFunds);

		// Dust cannot open an account; it stays free with the payer.
		if amount < C::minimum_balance() && C::total_balance(to).is_zero() {
			log::warn!(
				target: LOG_TARGET,
				"payout of {:?} below existential deposit left with payer",
				amount,
			);
			return Ok(());
		}

		C::transfer(from, to, amount, ExistenceRequirement::AllowDeath)
	}

	fn deposit_of(who: &T::AccountId) -> Option<Coin> {
		let reserved = C::reserved_balance(who);
		if reserved.is_zero() {
			return None;
		}

		Some(Coin { denom: NativeDenom::get(), amount: reserved.saturated_into() })
	}
}
