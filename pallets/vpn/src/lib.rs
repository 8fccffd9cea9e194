//! # VPN Pallet
//!
//! ## Overview
//!
//! Marketplace for VPN bandwidth. Node operators register servers and advertise per-GB
//! prices, resolvers vouch for nodes in exchange for a commission, and clients escrow a
//! deposit to open a subscription on a node through one of its resolvers.
//!
//! Usage is reported per session. Every report carries two signatures over the same
//! payload, one from the client and one from the node owner. A session is settled either
//! by the node owner through [`Pallet::end_session`] or automatically in `on_finalize`
//! once it has gone `session_inactive_interval` blocks without a report. Settlement bills
//! the reported usage rounded up to whole price units and splits the payment between the
//! resolver and the node owner.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! - `register_node`, `update_node_info`, `update_node_status`, `deregister_node`
//! - `add_free_client`, `remove_free_client`
//! - `register_vpn_on_resolver`, `deregister_vpn_on_resolver`
//! - `register_resolver`, `update_resolver_info`, `deregister_resolver`
//! - `start_subscription`, `end_subscription`
//! - `update_session_info`, `end_session`
//! - `set_params` (root)
//!
//! Please refer to the [`Call`] enum and its associated variants for documentation on each
//! function.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;

use frame_support::pallet_prelude::*;
use frame_system::pallet_prelude::*;
use sp_std::prelude::*;

pub mod active;
pub mod billing;
pub mod keeper;
pub mod ledger;
pub mod settlement;
pub mod traits;
pub mod types;
pub mod weights;

pub use ledger::ReservedDeposits;
pub use settlement::SettlementFault;
pub use traits::DepositLedger;
pub use types::*;
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub(crate) const LOG_TARGET: &str = "runtime::vpn";

pub type NodeOf<T> = Node<<T as frame_system::Config>::AccountId, BlockNumberFor<T>>;
pub type ResolverOf<T> = Resolver<<T as frame_system::Config>::AccountId, BlockNumberFor<T>>;
pub type SubscriptionOf<T> =
	Subscription<<T as frame_system::Config>::AccountId, BlockNumberFor<T>>;
pub type SessionOf<T> = Session<BlockNumberFor<T>>;
pub type ParamsOf<T> = VpnParams<BlockNumberFor<T>>;
pub type BandwidthSignatureOf<T> =
	BandwidthSignature<<T as pallet::Config>::Signer, <T as pallet::Config>::Signature>;

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use sp_arithmetic::Perbill;
	use sp_runtime::traits::{IdentifyAccount, Verify, Zero};

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		/// Because this pallet emits events, it depends on the runtime's definition of an event.
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Weight information for extrinsics in this pallet.
		type WeightInfo: WeightInfo;

		/// Escrow for node collateral and subscription deposits.
		type Deposits: DepositLedger<Self::AccountId>;

		/// Public key embedded in a bandwidth signature.
		type Signer: Parameter + Member + IdentifyAccount<AccountId = Self::AccountId>;

		/// Signature over a [`BandwidthSignatureData`] payload.
		type Signature: Parameter + Member + Verify<Signer = Self::Signer>;

		#[pallet::constant]
		type DefaultFreeNodesCount: Get<u64>;

		#[pallet::constant]
		type DefaultDeposit: Get<Coin>;

		#[pallet::constant]
		type DefaultSessionInactiveInterval: Get<BlockNumberFor<Self>>;
	}

	#[pallet::type_value]
	pub fn DefaultParams<T: Config>() -> ParamsOf<T> {
		VpnParams {
			free_nodes_count: T::DefaultFreeNodesCount::get(),
			deposit: T::DefaultDeposit::get(),
			session_inactive_interval: T::DefaultSessionInactiveInterval::get(),
		}
	}

	#[pallet::storage]
	pub type Params<T: Config> = StorageValue<_, ParamsOf<T>, ValueQuery, DefaultParams<T>>;

	// Nodes

	#[pallet::storage]
	pub type NodesCount<T: Config> = StorageValue<_, u64, ValueQuery>;

	#[pallet::storage]
	pub type Nodes<T: Config> = StorageMap<_, Twox64Concat, NodeId, NodeOf<T>, OptionQuery>;

	#[pallet::storage]
	pub type NodesCountOfAddress<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, u64, ValueQuery>;

	/// (owner, sequence) -> node
	#[pallet::storage]
	pub type NodeIdByAddress<T: Config> = StorageDoubleMap<
		_,
		Blake2_128Concat,
		T::AccountId,
		Twox64Concat,
		u64,
		NodeId,
		OptionQuery,
	>;

	#[pallet::storage]
	pub type FreeClientsOfNode<T: Config> = StorageDoubleMap<
		_,
		Twox64Concat,
		NodeId,
		Blake2_128Concat,
		T::AccountId,
		(),
		OptionQuery,
	>;

	#[pallet::storage]
	pub type FreeNodesOfClient<T: Config> = StorageDoubleMap<
		_,
		Blake2_128Concat,
		T::AccountId,
		Twox64Concat,
		NodeId,
		(),
		OptionQuery,
	>;

	#[pallet::storage]
	pub type ResolversOfNode<T: Config> =
		StorageDoubleMap<_, Twox64Concat, NodeId, Twox64Concat, ResolverId, (), OptionQuery>;

	#[pallet::storage]
	pub type NodesOfResolver<T: Config> =
		StorageDoubleMap<_, Twox64Concat, ResolverId, Twox64Concat, NodeId, (), OptionQuery>;

	// Subscriptions

	#[pallet::storage]
	pub type SubscriptionsCount<T: Config> = StorageValue<_, u64, ValueQuery>;

	#[pallet::storage]
	pub type Subscriptions<T: Config> =
		StorageMap<_, Twox64Concat, SubscriptionId, SubscriptionOf<T>, OptionQuery>;

	#[pallet::storage]
	pub type SubscriptionsCountOfNode<T: Config> =
		StorageMap<_, Twox64Concat, NodeId, u64, ValueQuery>;

	/// (node, sequence) -> subscription
	#[pallet::storage]
	pub type SubscriptionIdByNodeId<T: Config> = StorageDoubleMap<
		_,
		Twox64Concat,
		NodeId,
		Twox64Concat,
		u64,
		SubscriptionId,
		OptionQuery,
	>;

	#[pallet::storage]
	pub type SubscriptionsCountOfAddress<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, u64, ValueQuery>;

	/// (client, sequence) -> subscription
	#[pallet::storage]
	pub type SubscriptionIdByAddress<T: Config> = StorageDoubleMap<
		_,
		Blake2_128Concat,
		T::AccountId,
		Twox64Concat,
		u64,
		SubscriptionId,
		OptionQuery,
	>;

	// Sessions

	#[pallet::storage]
	pub type SessionsCount<T: Config> = StorageValue<_, u64, ValueQuery>;

	#[pallet::storage]
	pub type Sessions<T: Config> = StorageMap<_, Twox64Concat, SessionId, SessionOf<T>, OptionQuery>;

	/// Settled sessions of a subscription. Also the index of its current session slot.
	#[pallet::storage]
	pub type SessionsCountOfSubscription<T: Config> =
		StorageMap<_, Twox64Concat, SubscriptionId, u64, ValueQuery>;

	/// (subscription, slot) -> session
	#[pallet::storage]
	pub type SessionIdBySubscriptionId<T: Config> = StorageDoubleMap<
		_,
		Twox64Concat,
		SubscriptionId,
		Twox64Concat,
		u64,
		SessionId,
		OptionQuery,
	>;

	/// Active sessions bucketed by the height of their last report, kept sorted.
	#[pallet::storage]
	pub type ActiveSessionIds<T: Config> =
		StorageMap<_, Twox64Concat, BlockNumberFor<T>, Vec<SessionId>, ValueQuery>;

	// Resolvers

	#[pallet::storage]
	pub type ResolversCount<T: Config> = StorageValue<_, u64, ValueQuery>;

	#[pallet::storage]
	pub type Resolvers<T: Config> =
		StorageMap<_, Twox64Concat, ResolverId, ResolverOf<T>, OptionQuery>;

	#[pallet::storage]
	pub type ResolversCountOfAddress<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, u64, ValueQuery>;

	/// (owner, sequence) -> resolver
	#[pallet::storage]
	pub type ResolverIdByAddress<T: Config> = StorageDoubleMap<
		_,
		Blake2_128Concat,
		T::AccountId,
		Twox64Concat,
		u64,
		ResolverId,
		OptionQuery,
	>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		NodeRegistered { owner: T::AccountId, node_id: NodeId, deposit: Coin },
		NodeInfoUpdated { owner: T::AccountId, node_id: NodeId },
		NodeStatusUpdated { owner: T::AccountId, node_id: NodeId, status: NodeStatus },
		NodeDeregistered { owner: T::AccountId, node_id: NodeId, refunded: Coin },
		FreeClientAdded { owner: T::AccountId, node_id: NodeId, client: T::AccountId },
		FreeClientRemoved { owner: T::AccountId, node_id: NodeId, client: T::AccountId },
		VpnRegisteredOnResolver { owner: T::AccountId, node_id: NodeId, resolver_id: ResolverId },
		VpnDeregisteredOnResolver { owner: T::AccountId, node_id: NodeId, resolver_id: ResolverId },
		ResolverRegistered { owner: T::AccountId, resolver_id: ResolverId, commission: Perbill },
		ResolverInfoUpdated { owner: T::AccountId, resolver_id: ResolverId, commission: Perbill },
		ResolverDeregistered { owner: T::AccountId, resolver_id: ResolverId },
		SubscriptionStarted {
			client: T::AccountId,
			subscription_id: SubscriptionId,
			node_id: NodeId,
			resolver_id: ResolverId,
			deposit: Coin,
		},
		SubscriptionEnded { client: T::AccountId, subscription_id: SubscriptionId, refunded: Coin },
		SessionUpdated {
			from: T::AccountId,
			subscription_id: SubscriptionId,
			session_id: SessionId,
			bandwidth: Bandwidth,
		},
		/// A session was closed by its node owner.
		SessionEnded {
			from: T::AccountId,
			subscription_id: SubscriptionId,
			session_id: SessionId,
			paid: Coin,
			commission: Coin,
		},
		/// A session was closed by the inactivity sweep.
		SessionSettled {
			subscription_id: SubscriptionId,
			session_id: SessionId,
			paid: Coin,
			commission: Coin,
		},
		ParamsUpdated { params: ParamsOf<T> },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Sender is not the owner or client the entity requires.
		Unauthorized,
		NodeDoesNotExist,
		InvalidNodeStatus,
		InvalidNodeType,
		InvalidVersion,
		InvalidMoniker,
		InvalidPricesPerGb,
		InvalidInternetSpeed,
		InvalidEncryption,
		/// Deposit is malformed or the node has no price in its denom.
		InvalidDeposit,
		SubscriptionDoesNotExist,
		InvalidSubscriptionStatus,
		/// Reported bandwidth is zero on a side or exceeds what is left.
		InvalidBandwidth,
		InvalidBandwidthSignature,
		/// The current session slot is still open.
		SessionAlreadyExists,
		InvalidSessionStatus,
		ResolverDoesNotExist,
		InvalidResolverStatus,
		FreeClientDoesNotExist,
		InvalidParams,
		/// Escrowed funds are lower than the amount requested.
		InsufficientDepositFunds,
		/// The deposit ledger does not hold this denomination.
		InvalidDepositDenom,
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		fn on_initialize(now: BlockNumberFor<T>) -> Weight {
			let due = Self::sweep_height(now)
				.map(|height| ActiveSessionIds::<T>::decode_len(height).unwrap_or(0))
				.unwrap_or(0);

			T::WeightInfo::settle_inactive_sessions(due as u32)
		}

		fn on_finalize(now: BlockNumberFor<T>) {
			if let Err(fault) = Self::end_block(now) {
				log::error!(target: LOG_TARGET, "settlement sweep at {:?} aborted: {:?}", now, fault);
				panic!("vpn settlement invariant violated: {:?}", fault);
			}
		}
	}

	#[pallet::call(weight(<T as Config>::WeightInfo))]
	impl<T: Config> Pallet<T> {
		/// Registers a VPN node owned by the sender. Owners past the free quota post the
		/// configured deposit.
		#[pallet::call_index(0)]
		pub fn register_node(
			origin: OriginFor<T>,
			node_type: Vec<u8>,
			version: Vec<u8>,
			moniker: Vec<u8>,
			prices_per_gb: Vec<Coin>,
			internet_speed: Bandwidth,
			encryption: Vec<u8>,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;

			ensure!(!node_type.is_empty(), Error::<T>::InvalidNodeType);
			ensure!(!version.is_empty(), Error::<T>::InvalidVersion);
			ensure!(moniker.len() <= MAX_MONIKER_LENGTH, Error::<T>::InvalidMoniker);
			ensure!(
				!prices_per_gb.is_empty() && coins_are_valid(&prices_per_gb),
				Error::<T>::InvalidPricesPerGb
			);
			ensure!(internet_speed.is_all_positive(), Error::<T>::InvalidInternetSpeed);
			ensure!(!encryption.is_empty(), Error::<T>::InvalidEncryption);

			let params = Params::<T>::get();
			let deposit = if NodesCountOfAddress::<T>::get(&owner) >= params.free_nodes_count {
				params.deposit
			} else {
				Coin::zero_of(&params.deposit.denom)
			};

			if deposit.is_positive() {
				T::Deposits::add_deposit(&owner, &deposit)?;
			}

			let node_id = Self::append_node(|id| Node {
				id,
				owner: owner.clone(),
				deposit: deposit.clone(),
				node_type,
				version,
				moniker,
				prices_per_gb,
				internet_speed,
				encryption,
				status: NodeStatus::Registered,
				status_modified_at: frame_system::Pallet::<T>::block_number(),
			});

			log::debug!(target: LOG_TARGET, "node {:?} registered by {:?}", node_id, owner);
			Self::deposit_event(Event::NodeRegistered { owner, node_id, deposit });
			Ok(())
		}

		/// Overwrites the node fields that are present in `info`.
		#[pallet::call_index(1)]
		pub fn update_node_info(
			origin: OriginFor<T>,
			node_id: NodeId,
			info: NodeInfoUpdate,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;

			ensure!(info.moniker.len() <= MAX_MONIKER_LENGTH, Error::<T>::InvalidMoniker);
			if let Some(prices) = &info.prices_per_gb {
				ensure!(
					!prices.is_empty() && coins_are_valid(prices),
					Error::<T>::InvalidPricesPerGb
				);
			}

			let mut node = Self::owned_live_node(node_id, &owner)?;
			node.apply_update(info);
			Nodes::<T>::insert(node_id, node);

			Self::deposit_event(Event::NodeInfoUpdated { owner, node_id });
			Ok(())
		}

		/// Moves a node between `Registered` and `Inactive`. Inactive nodes take no new
		/// subscriptions.
		#[pallet::call_index(2)]
		pub fn update_node_status(
			origin: OriginFor<T>,
			node_id: NodeId,
			status: NodeStatus,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;
			ensure!(status != NodeStatus::DeRegistered, Error::<T>::InvalidNodeStatus);

			let mut node = Self::owned_live_node(node_id, &owner)?;
			node.status = status;
			node.status_modified_at = frame_system::Pallet::<T>::block_number();
			Nodes::<T>::insert(node_id, node);

			Self::deposit_event(Event::NodeStatusUpdated { owner, node_id, status });
			Ok(())
		}

		/// Retires a node for good and refunds its collateral.
		#[pallet::call_index(3)]
		pub fn deregister_node(origin: OriginFor<T>, node_id: NodeId) -> DispatchResult {
			let owner = ensure_signed(origin)?;
			let mut node = Self::owned_live_node(node_id, &owner)?;

			if node.deposit.is_positive() {
				T::Deposits::subtract_deposit(&owner, &node.deposit)?;
			}

			let refunded = node.deposit.clone();
			node.status = NodeStatus::DeRegistered;
			node.status_modified_at = frame_system::Pallet::<T>::block_number();
			Nodes::<T>::insert(node_id, node);

			log::debug!(target: LOG_TARGET, "node {:?} deregistered", node_id);
			Self::deposit_event(Event::NodeDeregistered { owner, node_id, refunded });
			Ok(())
		}

		#[pallet::call_index(4)]
		pub fn add_free_client(
			origin: OriginFor<T>,
			node_id: NodeId,
			client: T::AccountId,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;
			Self::owned_live_node(node_id, &owner)?;

			FreeClientsOfNode::<T>::insert(node_id, &client, ());
			FreeNodesOfClient::<T>::insert(&client, node_id, ());

			Self::deposit_event(Event::FreeClientAdded { owner, node_id, client });
			Ok(())
		}

		#[pallet::call_index(5)]
		pub fn remove_free_client(
			origin: OriginFor<T>,
			node_id: NodeId,
			client: T::AccountId,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;
			Self::owned_live_node(node_id, &owner)?;
			ensure!(Self::is_free_client(node_id, &client), Error::<T>::FreeClientDoesNotExist);

			FreeClientsOfNode::<T>::remove(node_id, &client);
			FreeNodesOfClient::<T>::remove(&client, node_id);

			Self::deposit_event(Event::FreeClientRemoved { owner, node_id, client });
			Ok(())
		}

		/// Lists the node under a resolver, which lets clients subscribe through it.
		#[pallet::call_index(6)]
		pub fn register_vpn_on_resolver(
			origin: OriginFor<T>,
			node_id: NodeId,
			resolver_id: ResolverId,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;
			Self::owned_live_node(node_id, &owner)?;

			let resolver = Resolvers::<T>::get(resolver_id).ok_or(Error::<T>::ResolverDoesNotExist)?;
			ensure!(
				resolver.status != ResolverStatus::DeRegistered,
				Error::<T>::InvalidResolverStatus
			);

			ResolversOfNode::<T>::insert(node_id, resolver_id, ());
			NodesOfResolver::<T>::insert(resolver_id, node_id, ());

			Self::deposit_event(Event::VpnRegisteredOnResolver { owner, node_id, resolver_id });
			Ok(())
		}

		#[pallet::call_index(7)]
		pub fn deregister_vpn_on_resolver(
			origin: OriginFor<T>,
			node_id: NodeId,
			resolver_id: ResolverId,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;
			Self::owned_live_node(node_id, &owner)?;
			ensure!(Resolvers::<T>::contains_key(resolver_id), Error::<T>::ResolverDoesNotExist);
			ensure!(
				ResolversOfNode::<T>::contains_key(node_id, resolver_id),
				Error::<T>::ResolverDoesNotExist
			);

			ResolversOfNode::<T>::remove(node_id, resolver_id);
			NodesOfResolver::<T>::remove(resolver_id, node_id);

			Self::deposit_event(Event::VpnDeregisteredOnResolver { owner, node_id, resolver_id });
			Ok(())
		}

		#[pallet::call_index(8)]
		pub fn register_resolver(origin: OriginFor<T>, commission: Perbill) -> DispatchResult {
			let owner = ensure_signed(origin)?;

			let resolver_id = Self::append_resolver(|id| Resolver {
				id,
				owner: owner.clone(),
				commission,
				status: ResolverStatus::Registered,
				status_modified_at: frame_system::Pallet::<T>::block_number(),
			});

			Self::deposit_event(Event::ResolverRegistered { owner, resolver_id, commission });
			Ok(())
		}

		#[pallet::call_index(9)]
		pub fn update_resolver_info(
			origin: OriginFor<T>,
			resolver_id: ResolverId,
			commission: Perbill,
		) -> DispatchResult {
			let owner = ensure_signed(origin)?;

			let mut resolver = Self::owned_registered_resolver(resolver_id, &owner)?;
			resolver.commission = commission;
			Resolvers::<T>::insert(resolver_id, resolver);

			Self::deposit_event(Event::ResolverInfoUpdated { owner, resolver_id, commission });
			Ok(())
		}

		/// Retires a resolver. Unlike nodes, a resolver that is already deregistered is
		/// rejected.
		#[pallet::call_index(10)]
		pub fn deregister_resolver(origin: OriginFor<T>, resolver_id: ResolverId) -> DispatchResult {
			let owner = ensure_signed(origin)?;

			let mut resolver = Self::owned_registered_resolver(resolver_id, &owner)?;
			resolver.status = ResolverStatus::DeRegistered;
			resolver.status_modified_at = frame_system::Pallet::<T>::block_number();
			Resolvers::<T>::insert(resolver_id, resolver);

			Self::deposit_event(Event::ResolverDeregistered { owner, resolver_id });
			Ok(())
		}

		/// Opens a subscription on `node_id` through `resolver_id`. The deposit is escrowed
		/// unless the sender is a free client of the node.
		#[pallet::call_index(11)]
		pub fn start_subscription(
			origin: OriginFor<T>,
			resolver_id: ResolverId,
			node_id: NodeId,
			deposit: Coin,
		) -> DispatchResult {
			let client = ensure_signed(origin)?;
			ensure!(deposit.is_valid() && deposit.is_positive(), Error::<T>::InvalidDeposit);

			let node = Nodes::<T>::get(node_id).ok_or(Error::<T>::NodeDoesNotExist)?;
			ensure!(node.status == NodeStatus::Registered, Error::<T>::InvalidNodeStatus);
			ensure!(
				ResolversOfNode::<T>::contains_key(node_id, resolver_id),
				Error::<T>::ResolverDoesNotExist
			);

			let price = node.price_of(&deposit.denom).ok_or(Error::<T>::InvalidDeposit)?.clone();
			let bandwidth =
				billing::deposit_to_bandwidth(&deposit, &price).ok_or(Error::<T>::InvalidDeposit)?;

			let free_client = Self::is_free_client(node_id, &client);
			if !free_client {
				T::Deposits::add_deposit(&client, &deposit)?;
			}

			let subscription_id = Self::append_subscription(|id| Subscription {
				id,
				resolver_id,
				node_id,
				client: client.clone(),
				price_per_gb: price,
				total_deposit: deposit.clone(),
				remaining_deposit: deposit.clone(),
				remaining_bandwidth: bandwidth,
				free_client,
				status: SubscriptionStatus::Active,
				status_modified_at: frame_system::Pallet::<T>::block_number(),
			});

			log::debug!(
				target: LOG_TARGET,
				"subscription {:?} started on node {:?} by {:?}",
				subscription_id,
				node_id,
				client
			);
			Self::deposit_event(Event::SubscriptionStarted {
				client,
				subscription_id,
				node_id,
				resolver_id,
				deposit,
			});
			Ok(())
		}

		/// Closes a subscription and refunds whatever deposit is left. The current session
		/// slot must be empty.
		#[pallet::call_index(12)]
		pub fn end_subscription(
			origin: OriginFor<T>,
			subscription_id: SubscriptionId,
		) -> DispatchResult {
			let client = ensure_signed(origin)?;

			let mut subscription = Subscriptions::<T>::get(subscription_id)
				.ok_or(Error::<T>::SubscriptionDoesNotExist)?;
			ensure!(subscription.client == client, Error::<T>::Unauthorized);
			ensure!(
				subscription.status == SubscriptionStatus::Active,
				Error::<T>::InvalidSubscriptionStatus
			);
			ensure!(
				Self::current_session_id(subscription_id).is_none(),
				Error::<T>::SessionAlreadyExists
			);

			let refunded = if subscription.free_client {
				Coin::zero_of(&subscription.remaining_deposit.denom)
			} else {
				subscription.remaining_deposit.clone()
			};
			if refunded.is_positive() {
				T::Deposits::subtract_deposit(&client, &refunded)?;
			}

			subscription.status = SubscriptionStatus::Inactive;
			subscription.status_modified_at = frame_system::Pallet::<T>::block_number();
			Subscriptions::<T>::insert(subscription_id, subscription);

			Self::deposit_event(Event::SubscriptionEnded { client, subscription_id, refunded });
			Ok(())
		}

		/// Records cumulative usage for the subscription's current session, opening the
		/// session on the first report. Both the client and the node owner must have signed
		/// `(subscription_id, session slot, bandwidth)`.
		#[pallet::call_index(13)]
		pub fn update_session_info(
			origin: OriginFor<T>,
			subscription_id: SubscriptionId,
			bandwidth: Bandwidth,
			node_owner_signature: BandwidthSignatureOf<T>,
			client_signature: BandwidthSignatureOf<T>,
		) -> DispatchResult {
			let from = ensure_signed(origin)?;
			ensure!(!bandwidth.is_any_zero(), Error::<T>::InvalidBandwidth);

			let subscription = Subscriptions::<T>::get(subscription_id)
				.ok_or(Error::<T>::SubscriptionDoesNotExist)?;
			ensure!(
				subscription.status != SubscriptionStatus::Inactive,
				Error::<T>::InvalidSubscriptionStatus
			);
			let node = Nodes::<T>::get(subscription.node_id).ok_or(Error::<T>::NodeDoesNotExist)?;

			let slot = SessionsCountOfSubscription::<T>::get(subscription_id);
			let payload = BandwidthSignatureData::new(subscription_id, slot, bandwidth);
			Self::verify_bandwidth_signatures(
				&payload,
				[(&client_signature, &subscription.client), (&node_owner_signature, &node.owner)],
			)?;

			ensure!(
				bandwidth.all_lte(&subscription.remaining_bandwidth),
				Error::<T>::InvalidBandwidth
			);

			let now = frame_system::Pallet::<T>::block_number();
			let (mut session, previous_height) = match Self::current_session_id(subscription_id) {
				Some(id) => {
					let session = Sessions::<T>::get(id).ok_or(Error::<T>::InvalidSessionStatus)?;
					let height = session.status_modified_at;
					(session, Some(height))
				},
				None => {
					let id = Self::append_session(subscription_id, slot);
					let session = Session {
						id,
						subscription_id,
						bandwidth: Bandwidth::default(),
						status: SessionStatus::Active,
						status_modified_at: now,
					};
					(session, None)
				},
			};

			Self::relocate_session(previous_height, now, session.id);
			session.bandwidth = bandwidth;
			session.status = SessionStatus::Active;
			session.status_modified_at = now;

			let session_id = session.id;
			Sessions::<T>::insert(session_id, session);

			Self::deposit_event(Event::SessionUpdated {
				from,
				subscription_id,
				session_id,
				bandwidth,
			});
			Ok(())
		}

		/// Settles the subscription's current session on behalf of its node owner.
		#[pallet::call_index(14)]
		pub fn end_session(origin: OriginFor<T>, subscription_id: SubscriptionId) -> DispatchResult {
			let from = ensure_signed(origin)?;

			let subscription = Subscriptions::<T>::get(subscription_id)
				.ok_or(Error::<T>::SubscriptionDoesNotExist)?;
			ensure!(
				subscription.status != SubscriptionStatus::Inactive,
				Error::<T>::InvalidSubscriptionStatus
			);
			let node = Nodes::<T>::get(subscription.node_id).ok_or(Error::<T>::NodeDoesNotExist)?;
			ensure!(node.owner == from, Error::<T>::Unauthorized);

			let session_id =
				Self::current_session_id(subscription_id).ok_or(Error::<T>::InvalidSessionStatus)?;
			let session = Sessions::<T>::get(session_id).ok_or(Error::<T>::InvalidSessionStatus)?;
			let last_report = session.status_modified_at;

			let now = frame_system::Pallet::<T>::block_number();
			let outcome = Self::settle_session(subscription, session, now)
				.map_err(|fault| fault.into_dispatch_error::<T>())?;
			Self::remove_session_from_active_list(last_report, session_id);

			log::debug!(
				target: LOG_TARGET,
				"session {:?} of subscription {:?} ended, paid {}",
				session_id,
				subscription_id,
				outcome.paid.amount
			);
			Self::deposit_event(Event::SessionEnded {
				from,
				subscription_id,
				session_id,
				paid: outcome.paid,
				commission: outcome.commission,
			});
			Ok(())
		}

		#[pallet::call_index(15)]
		pub fn set_params(origin: OriginFor<T>, params: ParamsOf<T>) -> DispatchResult {
			ensure_root(origin)?;

			ensure!(params.free_nodes_count > 0, Error::<T>::InvalidParams);
			ensure!(!params.session_inactive_interval.is_zero(), Error::<T>::InvalidParams);
			ensure!(
				params.deposit.is_valid() && params.deposit.amount >= MIN_DEPOSIT_AMOUNT,
				Error::<T>::InvalidParams
			);

			Params::<T>::put(params.clone());

			Self::deposit_event(Event::ParamsUpdated { params });
			Ok(())
		}
	}

	impl<T: Config> Pallet<T> {
		/// Node owned by `owner` that has not been deregistered.
		pub(crate) fn owned_live_node(
			node_id: NodeId,
			owner: &T::AccountId,
		) -> Result<NodeOf<T>, DispatchError> {
			let node = Nodes::<T>::get(node_id).ok_or(Error::<T>::NodeDoesNotExist)?;
			ensure!(&node.owner == owner, Error::<T>::Unauthorized);
			ensure!(node.status != NodeStatus::DeRegistered, Error::<T>::InvalidNodeStatus);
			Ok(node)
		}

		pub(crate) fn owned_registered_resolver(
			resolver_id: ResolverId,
			owner: &T::AccountId,
		) -> Result<ResolverOf<T>, DispatchError> {
			let resolver =
				Resolvers::<T>::get(resolver_id).ok_or(Error::<T>::ResolverDoesNotExist)?;
			ensure!(&resolver.owner == owner, Error::<T>::Unauthorized);
			ensure!(
				resolver.status == ResolverStatus::Registered,
				Error::<T>::InvalidResolverStatus
			);
			Ok(resolver)
		}

		/// Every signer must be its expected account, and only then is each signature checked
		/// against `payload`.
		pub(crate) fn verify_bandwidth_signatures(
			payload: &BandwidthSignatureData,
			proofs: [(&BandwidthSignatureOf<T>, &T::AccountId); 2],
		) -> DispatchResult {
			for (proof, expected) in proofs {
				ensure!(&proof.signer.clone().into_account() == expected, Error::<T>::Unauthorized);
			}

			let message = payload.to_sign_bytes();
			for (proof, expected) in proofs {
				ensure!(
					proof.signature.verify(&message[..], expected),
					Error::<T>::InvalidBandwidthSignature
				);
			}
			Ok(())
		}
	}
}
