//! Benchmarking setup for pallet-vpn
#![cfg(feature = "runtime-benchmarks")]
use super::*;

#[allow(unused)]
use crate::Pallet as Vpn;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;
use sp_arithmetic::Perbill;
use sp_std::vec;

fn register_node_of<T: Config>(owner: &T::AccountId) -> NodeId {
	Pallet::<T>::append_node(|id| Node {
		id,
		owner: owner.clone(),
		deposit: Coin::zero_of(&T::DefaultDeposit::get().denom),
		node_type: b"wireguard".to_vec(),
		version: b"1.0.0".to_vec(),
		moniker: b"bench".to_vec(),
		prices_per_gb: vec![T::DefaultDeposit::get()],
		internet_speed: Bandwidth::new(1_000, 1_000),
		encryption: b"chacha20".to_vec(),
		status: NodeStatus::Registered,
		status_modified_at: frame_system::Pallet::<T>::block_number(),
	})
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn register_node() -> Result<(), BenchmarkError> {
		let caller: T::AccountId = whitelisted_caller();

		#[extrinsic_call]
		register_node(
			RawOrigin::Signed(caller.clone()),
			b"wireguard".to_vec(),
			b"1.0.0".to_vec(),
			vec![b'm'; MAX_MONIKER_LENGTH],
			vec![T::DefaultDeposit::get()],
			Bandwidth::new(1_000, 1_000),
			b"chacha20".to_vec(),
		);

		assert_eq!(NodesCountOfAddress::<T>::get(&caller), 1);

		Ok(())
	}

	#[benchmark]
	fn update_node_status() -> Result<(), BenchmarkError> {
		let caller: T::AccountId = whitelisted_caller();
		let node_id = register_node_of::<T>(&caller);

		#[extrinsic_call]
		update_node_status(RawOrigin::Signed(caller), node_id, NodeStatus::Inactive);

		assert_eq!(Nodes::<T>::get(node_id).map(|n| n.status), Some(NodeStatus::Inactive));

		Ok(())
	}

	#[benchmark]
	fn add_free_client() -> Result<(), BenchmarkError> {
		let caller: T::AccountId = whitelisted_caller();
		let client: T::AccountId = account("client", 0, 0);
		let node_id = register_node_of::<T>(&caller);

		#[extrinsic_call]
		add_free_client(RawOrigin::Signed(caller), node_id, client.clone());

		assert!(Pallet::<T>::is_free_client(node_id, &client));

		Ok(())
	}

	#[benchmark]
	fn register_resolver() -> Result<(), BenchmarkError> {
		let caller: T::AccountId = whitelisted_caller();

		#[extrinsic_call]
		register_resolver(RawOrigin::Signed(caller.clone()), Perbill::from_percent(10));

		assert_eq!(ResolversCountOfAddress::<T>::get(&caller), 1);

		Ok(())
	}

	#[benchmark]
	fn register_vpn_on_resolver() -> Result<(), BenchmarkError> {
		let caller: T::AccountId = whitelisted_caller();
		let resolver_owner: T::AccountId = account("resolver", 0, 0);
		let node_id = register_node_of::<T>(&caller);
		Pallet::<T>::register_resolver(
			RawOrigin::Signed(resolver_owner).into(),
			Perbill::from_percent(10),
		)?;
		let resolver_id = ResolverId::new(0);

		#[extrinsic_call]
		register_vpn_on_resolver(RawOrigin::Signed(caller), node_id, resolver_id);

		assert_eq!(Pallet::<T>::resolvers_of_node(node_id), vec![resolver_id]);

		Ok(())
	}

	#[benchmark]
	fn set_params() -> Result<(), BenchmarkError> {
		let params = VpnParams {
			free_nodes_count: 10,
			deposit: T::DefaultDeposit::get(),
			session_inactive_interval: T::DefaultSessionInactiveInterval::get(),
		};

		#[extrinsic_call]
		set_params(RawOrigin::Root, params.clone());

		assert_eq!(Params::<T>::get(), params);

		Ok(())
	}

	impl_benchmark_test_suite!(Vpn, crate::mock::new_test_ext(), crate::mock::Test);
}
