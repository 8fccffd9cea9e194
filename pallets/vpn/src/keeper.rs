//! Keyed accessors over the pallet storage.
//!
//! Lists owned by an account or parent entity are kept as a counter plus a
//! `(parent, sequence) -> id` indirection table. Appending bumps the counter, and
//! listing walks `0..count` so results come back in creation order.

use crate::{pallet::*, types::*, NodeOf, ParamsOf, ResolverOf, SessionOf, SubscriptionOf};
use sp_std::prelude::*;

impl<T: Config> Pallet<T> {
	/// Allocates the next node id, stores the node built for it and indexes it under its
	/// owner.
	pub(crate) fn append_node(build: impl FnOnce(NodeId) -> NodeOf<T>) -> NodeId {
		let id = NodeId::new(NodesCount::<T>::get());
		let node = build(id);

		let seq = NodesCountOfAddress::<T>::get(&node.owner);
		NodeIdByAddress::<T>::insert(&node.owner, seq, id);
		NodesCountOfAddress::<T>::insert(&node.owner, seq.saturating_add(1));
		NodesCount::<T>::put(id.value().saturating_add(1));
		Nodes::<T>::insert(id, node);

		id
	}

	pub(crate) fn append_resolver(build: impl FnOnce(ResolverId) -> ResolverOf<T>) -> ResolverId {
		let id = ResolverId::new(ResolversCount::<T>::get());
		let resolver = build(id);

		let seq = ResolversCountOfAddress::<T>::get(&resolver.owner);
		ResolverIdByAddress::<T>::insert(&resolver.owner, seq, id);
		ResolversCountOfAddress::<T>::insert(&resolver.owner, seq.saturating_add(1));
		ResolversCount::<T>::put(id.value().saturating_add(1));
		Resolvers::<T>::insert(id, resolver);

		id
	}

	pub(crate) fn append_subscription(
		build: impl FnOnce(SubscriptionId) -> SubscriptionOf<T>,
	) -> SubscriptionId {
		let id = SubscriptionId::new(SubscriptionsCount::<T>::get());
		let subscription = build(id);

		let seq = SubscriptionsCountOfNode::<T>::get(subscription.node_id);
		SubscriptionIdByNodeId::<T>::insert(subscription.node_id, seq, id);
		SubscriptionsCountOfNode::<T>::insert(subscription.node_id, seq.saturating_add(1));

		let seq = SubscriptionsCountOfAddress::<T>::get(&subscription.client);
		SubscriptionIdByAddress::<T>::insert(&subscription.client, seq, id);
		SubscriptionsCountOfAddress::<T>::insert(&subscription.client, seq.saturating_add(1));

		SubscriptionsCount::<T>::put(id.value().saturating_add(1));
		Subscriptions::<T>::insert(id, subscription);

		id
	}

	/// Reserves the next session id for `slot` of a subscription. The caller stores the
	/// session itself.
	pub(crate) fn append_session(subscription_id: SubscriptionId, slot: u64) -> SessionId {
		let id = SessionId::new(SessionsCount::<T>::get());
		SessionIdBySubscriptionId::<T>::insert(subscription_id, slot, id);
		SessionsCount::<T>::put(id.value().saturating_add(1));
		id
	}

	/// Session occupying the subscription's current slot, if one has been opened.
	pub fn current_session_id(subscription_id: SubscriptionId) -> Option<SessionId> {
		let slot = SessionsCountOfSubscription::<T>::get(subscription_id);
		SessionIdBySubscriptionId::<T>::get(subscription_id, slot)
	}

	pub fn is_free_client(node_id: NodeId, client: &T::AccountId) -> bool {
		FreeClientsOfNode::<T>::contains_key(node_id, client)
	}

	pub fn params() -> ParamsOf<T> {
		Params::<T>::get()
	}

	// Nodes

	pub fn node(id: NodeId) -> Option<NodeOf<T>> {
		Nodes::<T>::get(id)
	}

	pub fn nodes_count_of_address(owner: &T::AccountId) -> u64 {
		NodesCountOfAddress::<T>::get(owner)
	}

	pub fn nodes_of_address(owner: &T::AccountId) -> Vec<NodeOf<T>> {
		(0..NodesCountOfAddress::<T>::get(owner))
			.filter_map(|seq| NodeIdByAddress::<T>::get(owner, seq))
			.filter_map(|id| Nodes::<T>::get(id))
			.collect()
	}

	pub fn all_nodes() -> Vec<NodeOf<T>> {
		(0..NodesCount::<T>::get()).filter_map(|id| Nodes::<T>::get(NodeId::new(id))).collect()
	}

	pub fn free_clients_of_node(node_id: NodeId) -> Vec<T::AccountId> {
		let mut clients: Vec<_> = FreeClientsOfNode::<T>::iter_key_prefix(node_id).collect();
		clients.sort();
		clients
	}

	/// Every whitelisted (node, client) pair, ordered by node then client.
	pub fn all_free_clients() -> Vec<FreeClient<T::AccountId>> {
		let mut pairs: Vec<_> = FreeClientsOfNode::<T>::iter_keys()
			.map(|(node_id, client)| FreeClient { node_id, client })
			.collect();
		pairs.sort_by(|a, b| (a.node_id, &a.client).cmp(&(b.node_id, &b.client)));
		pairs
	}

	pub fn free_nodes_of_client(client: &T::AccountId) -> Vec<NodeId> {
		let mut nodes: Vec<_> = FreeNodesOfClient::<T>::iter_key_prefix(client).collect();
		nodes.sort();
		nodes
	}

	pub fn resolvers_of_node(node_id: NodeId) -> Vec<ResolverId> {
		let mut resolvers: Vec<_> = ResolversOfNode::<T>::iter_key_prefix(node_id).collect();
		resolvers.sort();
		resolvers
	}

	pub fn nodes_of_resolver(resolver_id: ResolverId) -> Vec<NodeId> {
		let mut nodes: Vec<_> = NodesOfResolver::<T>::iter_key_prefix(resolver_id).collect();
		nodes.sort();
		nodes
	}

	// Subscriptions

	pub fn subscription(id: SubscriptionId) -> Option<SubscriptionOf<T>> {
		Subscriptions::<T>::get(id)
	}

	pub fn subscriptions_of_node(node_id: NodeId) -> Vec<SubscriptionOf<T>> {
		(0..SubscriptionsCountOfNode::<T>::get(node_id))
			.filter_map(|seq| SubscriptionIdByNodeId::<T>::get(node_id, seq))
			.filter_map(|id| Subscriptions::<T>::get(id))
			.collect()
	}

	pub fn subscriptions_of_address(client: &T::AccountId) -> Vec<SubscriptionOf<T>> {
		(0..SubscriptionsCountOfAddress::<T>::get(client))
			.filter_map(|seq| SubscriptionIdByAddress::<T>::get(client, seq))
			.filter_map(|id| Subscriptions::<T>::get(id))
			.collect()
	}

	pub fn all_subscriptions() -> Vec<SubscriptionOf<T>> {
		(0..SubscriptionsCount::<T>::get())
			.filter_map(|id| Subscriptions::<T>::get(SubscriptionId::new(id)))
			.collect()
	}

	// Sessions

	pub fn session(id: SessionId) -> Option<SessionOf<T>> {
		Sessions::<T>::get(id)
	}

	pub fn sessions_count_of_subscription(subscription_id: SubscriptionId) -> u64 {
		SessionsCountOfSubscription::<T>::get(subscription_id)
	}

	/// The open session of a subscription.
	pub fn session_of_subscription(subscription_id: SubscriptionId) -> Option<SessionOf<T>> {
		Self::current_session_id(subscription_id).and_then(|id| Sessions::<T>::get(id))
	}

	/// Every session a subscription has had, settled ones first and the open one last.
	pub fn sessions_of_subscription(subscription_id: SubscriptionId) -> Vec<SessionOf<T>> {
		let settled = SessionsCountOfSubscription::<T>::get(subscription_id);
		(0..=settled)
			.filter_map(|slot| SessionIdBySubscriptionId::<T>::get(subscription_id, slot))
			.filter_map(|id| Sessions::<T>::get(id))
			.collect()
	}

	pub fn all_sessions() -> Vec<SessionOf<T>> {
		(0..SessionsCount::<T>::get())
			.filter_map(|id| Sessions::<T>::get(SessionId::new(id)))
			.collect()
	}

	// Resolvers

	pub fn resolver(id: ResolverId) -> Option<ResolverOf<T>> {
		Resolvers::<T>::get(id)
	}

	pub fn resolvers_of_address(owner: &T::AccountId) -> Vec<ResolverOf<T>> {
		(0..ResolversCountOfAddress::<T>::get(owner))
			.filter_map(|seq| ResolverIdByAddress::<T>::get(owner, seq))
			.filter_map(|id| Resolvers::<T>::get(id))
			.collect()
	}

	pub fn all_resolvers() -> Vec<ResolverOf<T>> {
		(0..ResolversCount::<T>::get())
			.filter_map(|id| Resolvers::<T>::get(ResolverId::new(id)))
			.collect()
	}
}
