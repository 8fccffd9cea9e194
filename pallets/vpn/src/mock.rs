use crate as pallet_vpn;
use crate::{BandwidthSignature, BandwidthSignatureData, Coin, ReservedDeposits};
use frame_support::{
	derive_impl, parameter_types,
	traits::{OnFinalize, OnInitialize},
};
use sp_keyring::AccountKeyring;
use sp_runtime::{
	traits::{IdentifyAccount, IdentityLookup, Verify},
	BuildStorage, MultiSignature, MultiSigner,
};

pub type Signature = MultiSignature;
pub type AccountId = <<Signature as Verify>::Signer as IdentifyAccount>::AccountId;
pub type Balance = u128;

pub const INITIAL_BALANCE: Balance = 1_000_000;
pub const POOR_BALANCE: Balance = 50;

// Configure a mock runtime to test the pallet
frame_support::construct_runtime!(
	pub enum Test
	{
		System: frame_system,
		Balances: pallet_balances,
		Vpn: pallet_vpn,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = frame_system::mocking::MockBlock<Test>;
	type AccountId = AccountId;
	type AccountData = pallet_balances::AccountData<Balance>;
	type Lookup = IdentityLookup<Self::AccountId>;
}

parameter_types! {
	pub const ExistentialDeposit: Balance = 5;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = Balance;
	type AccountStore = System;
	type ExistentialDeposit = ExistentialDeposit;
}

parameter_types! {
	pub const DefaultFreeNodesCount: u64 = 5;
	pub DefaultDeposit: Coin = Coin::new(b"stake", 100);
	pub const DefaultSessionInactiveInterval: u64 = 25;
	pub NativeDenom: Vec<u8> = b"stake".to_vec();
}

impl pallet_vpn::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type WeightInfo = ();
	type Deposits = ReservedDeposits<Test, Balances, NativeDenom>;
	type Signer = MultiSigner;
	type Signature = MultiSignature;
	type DefaultFreeNodesCount = DefaultFreeNodesCount;
	type DefaultDeposit = DefaultDeposit;
	type DefaultSessionInactiveInterval = DefaultSessionInactiveInterval;
}

// Test accounts
pub fn alice() -> AccountId {
	AccountKeyring::Alice.to_account_id()
}
pub fn bob() -> AccountId {
	AccountKeyring::Bob.to_account_id()
}
pub fn charlie() -> AccountId {
	AccountKeyring::Charlie.to_account_id()
}
pub fn dave() -> AccountId {
	AccountKeyring::Dave.to_account_id()
}
pub fn eve() -> AccountId {
	AccountKeyring::Eve.to_account_id()
}
// Funded below the registration deposit
pub fn ferdie() -> AccountId {
	AccountKeyring::Ferdie.to_account_id()
}

pub fn stake(amount: u128) -> Coin {
	Coin::new(b"stake", amount)
}

/// `who`'s signature over a bandwidth report.
pub fn sign_bandwidth(
	who: AccountKeyring,
	data: &BandwidthSignatureData,
) -> BandwidthSignature<MultiSigner, MultiSignature> {
	BandwidthSignature {
		signer: MultiSigner::from(who.public()),
		signature: MultiSignature::from(who.sign(&data.to_sign_bytes())),
	}
}

/// Finalizes the current block, which runs the settlement sweep.
pub fn finalize_block() {
	Vpn::on_finalize(System::block_number());
}

/// Finalizes every block before `n` and starts block `n`.
pub fn run_to_block(n: u64) {
	while System::block_number() < n {
		finalize_block();
		System::set_block_number(System::block_number() + 1);
		Vpn::on_initialize(System::block_number());
	}
}

pub fn new_test_ext() -> sp_io::TestExternalities {
	let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

	pallet_balances::GenesisConfig::<Test> {
		balances: vec![
			(alice(), INITIAL_BALANCE),
			(bob(), INITIAL_BALANCE),
			(charlie(), INITIAL_BALANCE),
			(dave(), INITIAL_BALANCE),
			(eve(), INITIAL_BALANCE),
			(ferdie(), POOR_BALANCE),
		],
	}
	.assimilate_storage(&mut t)
	.unwrap();

	let mut ext: sp_io::TestExternalities = t.into();
	ext.execute_with(|| System::set_block_number(1));
	ext
}
