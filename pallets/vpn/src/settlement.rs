//! Session settlement, shared by `end_session` and the end-of-block sweep.

use crate::{
	billing,
	pallet::*,
	traits::DepositLedger,
	types::*,
	SessionOf, SubscriptionOf, LOG_TARGET,
};
use frame_support::{pallet_prelude::*, storage::with_storage_layer};
use frame_system::pallet_prelude::BlockNumberFor;
use sp_runtime::traits::{CheckedSub, Zero};

/// A settlement that cannot proceed. Returned to the caller from `end_session`. In the
/// sweep a failed transfer postpones the session and every other fault is fatal.
#[derive(Clone, Eq, PartialEq, RuntimeDebug)]
pub enum SettlementFault {
	SubscriptionNotFound(SubscriptionId),
	SessionNotFound(SessionId),
	NodeNotFound(NodeId),
	ResolverNotFound(ResolverId),
	Transfer(DispatchError),
}

impl From<DispatchError> for SettlementFault {
	fn from(err: DispatchError) -> Self {
		SettlementFault::Transfer(err)
	}
}

impl SettlementFault {
	pub fn into_dispatch_error<T: Config>(self) -> DispatchError {
		match self {
			SettlementFault::SubscriptionNotFound(_) => Error::<T>::SubscriptionDoesNotExist.into(),
			SettlementFault::SessionNotFound(_) => Error::<T>::InvalidSessionStatus.into(),
			SettlementFault::NodeNotFound(_) => Error::<T>::NodeDoesNotExist.into(),
			SettlementFault::ResolverNotFound(_) => Error::<T>::ResolverDoesNotExist.into(),
			SettlementFault::Transfer(err) => err,
		}
	}
}

/// Funds moved by one settlement.
#[derive(Clone, Eq, PartialEq, RuntimeDebug)]
pub struct SettlementOutcome {
	/// Everything charged to the client.
	pub paid: Coin,
	/// Part of `paid` that went to the resolver.
	pub commission: Coin,
}

impl<T: Config> Pallet<T> {
	/// Bills the session's reported bandwidth, pays the resolver and the node owner out of
	/// the client's escrow, closes the session at `now` and opens the next slot.
	///
	/// The active index is left to the caller.
	pub(crate) fn settle_session(
		mut subscription: SubscriptionOf<T>,
		mut session: SessionOf<T>,
		now: BlockNumberFor<T>,
	) -> Result<SettlementOutcome, SettlementFault> {
		let resolver = Resolvers::<T>::get(subscription.resolver_id)
			.ok_or(SettlementFault::ResolverNotFound(subscription.resolver_id))?;
		let node = Nodes::<T>::get(subscription.node_id)
			.ok_or(SettlementFault::NodeNotFound(subscription.node_id))?;

		let price = &subscription.price_per_gb;
		let settlement = billing::settle(
			&session.bandwidth,
			price,
			subscription.remaining_deposit.amount,
			resolver.commission,
			subscription.free_client,
		);

		if !settlement.is_free() {
			if settlement.to_resolver > 0 {
				T::Deposits::send_deposit(
					&subscription.client,
					&resolver.owner,
					&price.with_amount(settlement.to_resolver),
				)
				.map_err(SettlementFault::Transfer)?;
			}
			if settlement.to_node > 0 {
				T::Deposits::send_deposit(
					&subscription.client,
					&node.owner,
					&price.with_amount(settlement.to_node),
				)
				.map_err(SettlementFault::Transfer)?;
			}
		}

		let outcome = SettlementOutcome {
			paid: price.with_amount(settlement.pay),
			commission: price.with_amount(settlement.to_resolver),
		};

		subscription.remaining_deposit.amount =
			subscription.remaining_deposit.amount.saturating_sub(settlement.pay);
		subscription.remaining_bandwidth =
			subscription.remaining_bandwidth.saturating_sub(&session.bandwidth);

		session.status = SessionStatus::Inactive;
		session.status_modified_at = now;
		Sessions::<T>::insert(session.id, session);
		SessionsCountOfSubscription::<T>::mutate(subscription.id, |count| {
			*count = count.saturating_add(1)
		});
		Subscriptions::<T>::insert(subscription.id, subscription);

		Ok(outcome)
	}

	/// Height whose bucket is due at `now`, if the chain is old enough to have one.
	pub(crate) fn sweep_height(now: BlockNumberFor<T>) -> Option<BlockNumberFor<T>> {
		let interval = Params::<T>::get().session_inactive_interval;
		if interval.is_zero() {
			return None;
		}
		now.checked_sub(&interval)
	}

	/// Settles every session whose last report was exactly `session_inactive_interval`
	/// blocks ago, then drops that bucket. Returns the number of sessions settled.
	///
	/// A session whose payout the ledger refuses is rolled back and filed under `now`, so
	/// it is retried one interval later.
	pub(crate) fn end_block(now: BlockNumberFor<T>) -> Result<u32, SettlementFault> {
		let Some(height) = Self::sweep_height(now) else { return Ok(0) };

		let ids = Self::active_session_ids(height);
		if ids.is_empty() {
			return Ok(0);
		}

		let mut settled: u32 = 0;
		for id in ids.iter().copied() {
			let session = Sessions::<T>::get(id).ok_or(SettlementFault::SessionNotFound(id))?;
			let subscription_id = session.subscription_id;
			let subscription = Subscriptions::<T>::get(subscription_id)
				.ok_or(SettlementFault::SubscriptionNotFound(subscription_id))?;

			let attempt = session.clone();
			match with_storage_layer(|| Self::settle_session(subscription, attempt, now)) {
				Ok(outcome) => {
					settled = settled.saturating_add(1);
					Self::deposit_event(Event::SessionSettled {
						subscription_id,
						session_id: id,
						paid: outcome.paid,
						commission: outcome.commission,
					});
				},
				Err(SettlementFault::Transfer(err)) => {
					log::warn!(
						target: LOG_TARGET,
						"payout for session {:?} failed: {:?}, retrying after block {:?}",
						id,
						err,
						now
					);
					Self::postpone_session(session, now);
				},
				Err(fault) => return Err(fault),
			}
		}

		Self::delete_active_session_ids(height);

		log::info!(
			target: LOG_TARGET,
			"settled {} of {} inactive sessions from block {:?}",
			settled,
			ids.len(),
			height
		);
		Ok(settled)
	}

	fn postpone_session(mut session: SessionOf<T>, now: BlockNumberFor<T>) {
		let id = session.id;
		session.status_modified_at = now;
		Sessions::<T>::insert(id, session);
		Self::add_session_to_active_list(now, id);
	}
}
