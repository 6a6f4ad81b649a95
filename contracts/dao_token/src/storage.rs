use soroban_sdk::{contracttype, Address, Env, String};
use soroban_token_sdk::{metadata::TokenMetadata, TokenUtils};

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17280; // ~1 day in 5s ledgers
const INSTANCE_BUMP_AMOUNT: u32 = 518400; // ~30 days in 5s ledgers
const BALANCE_LIFETIME_THRESHOLD: u32 = 17280;
const BALANCE_BUMP_AMOUNT: u32 = 518400;

pub const TOKEN_NAME: &str = "DAO Token";
pub const TOKEN_SYMBOL: &str = "DAO";
pub const TOKEN_DECIMALS: u32 = 7;

#[contracttype]
#[derive(Clone, Debug)]
pub struct AllowanceEntry {
    pub amount: i128,
    pub expiration_ledger: u32,
}

/// Voting power of an account as of `ledger`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    pub ledger: u32,
    pub votes: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Admin,
    TotalSupply,
    Balance(Address),
    Allowance(Address, Address),
    Delegate(Address),
    Checkpoint(Address, u32),
    NumCheckpoints(Address),
    SupplyCheckpoint(u32),
    NumSupplyCheckpoints,
}

/// A voting-power history: one per delegate, plus one for the total supply.
/// Each checkpoint lives under its own key so writes touch a bounded amount
/// of storage regardless of history length.
#[derive(Clone, Debug)]
pub enum CheckpointSeries {
    Account(Address),
    Supply,
}

impl CheckpointSeries {
    fn count_key(&self) -> DataKey {
        match self {
            CheckpointSeries::Account(account) => DataKey::NumCheckpoints(account.clone()),
            CheckpointSeries::Supply => DataKey::NumSupplyCheckpoints,
        }
    }

    fn entry_key(&self, index: u32) -> DataKey {
        match self {
            CheckpointSeries::Account(account) => DataKey::Checkpoint(account.clone(), index),
            CheckpointSeries::Supply => DataKey::SupplyCheckpoint(index),
        }
    }
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage().persistent().extend_ttl(key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

pub fn write_metadata(env: &Env) {
    let metadata = TokenMetadata {
        decimal: TOKEN_DECIMALS,
        name: String::from_str(env, TOKEN_NAME),
        symbol: String::from_str(env, TOKEN_SYMBOL),
    };
    TokenUtils::new(env).metadata().set_metadata(&metadata);
}

pub fn read_metadata(env: &Env) -> TokenMetadata {
    TokenUtils::new(env).metadata().get_metadata()
}

pub fn get_total_supply(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::TotalSupply).unwrap_or(0)
}

pub fn set_total_supply(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &amount);
}

pub fn get_balance(env: &Env, id: &Address) -> i128 {
    let key = DataKey::Balance(id.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            extend_persistent_ttl(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_balance(env: &Env, id: &Address, amount: i128) {
    let key = DataKey::Balance(id.clone());
    env.storage().persistent().set(&key, &amount);
    extend_persistent_ttl(env, &key);
}

/// Returns the allowance entry, with `amount` zeroed once the entry has expired.
pub fn get_allowance(env: &Env, from: &Address, spender: &Address) -> AllowanceEntry {
    let key = DataKey::Allowance(from.clone(), spender.clone());
    match env.storage().temporary().get::<_, AllowanceEntry>(&key) {
        Some(entry) if entry.expiration_ledger < env.ledger().sequence() => AllowanceEntry {
            amount: 0,
            expiration_ledger: entry.expiration_ledger,
        },
        Some(entry) => entry,
        None => AllowanceEntry { amount: 0, expiration_ledger: 0 },
    }
}

pub fn set_allowance(env: &Env, from: &Address, spender: &Address, entry: &AllowanceEntry) {
    let key = DataKey::Allowance(from.clone(), spender.clone());
    env.storage().temporary().set(&key, entry);

    if entry.amount > 0 {
        let live_for = entry.expiration_ledger.saturating_sub(env.ledger().sequence());
        env.storage().temporary().extend_ttl(&key, live_for, live_for);
    }
}

pub fn get_delegate(env: &Env, account: &Address) -> Option<Address> {
    let key = DataKey::Delegate(account.clone());
    let delegate = env.storage().persistent().get(&key);
    if delegate.is_some() {
        extend_persistent_ttl(env, &key);
    }
    delegate
}

pub fn set_delegate(env: &Env, account: &Address, delegatee: &Address) {
    let key = DataKey::Delegate(account.clone());
    env.storage().persistent().set(&key, delegatee);
    extend_persistent_ttl(env, &key);
}

pub fn get_checkpoint_count(env: &Env, series: &CheckpointSeries) -> u32 {
    let key = series.count_key();
    match env.storage().persistent().get::<_, u32>(&key) {
        Some(count) => {
            extend_persistent_ttl(env, &key);
            count
        }
        None => 0,
    }
}

pub fn set_checkpoint_count(env: &Env, series: &CheckpointSeries, count: u32) {
    let key = series.count_key();
    env.storage().persistent().set(&key, &count);
    extend_persistent_ttl(env, &key);
}

/// Every index below the series count holds a checkpoint.
pub fn get_checkpoint(env: &Env, series: &CheckpointSeries, index: u32) -> Option<Checkpoint> {
    let key = series.entry_key(index);
    let checkpoint = env.storage().persistent().get(&key);
    if checkpoint.is_some() {
        extend_persistent_ttl(env, &key);
    }
    checkpoint
}

pub fn set_checkpoint(env: &Env, series: &CheckpointSeries, index: u32, checkpoint: &Checkpoint) {
    let key = series.entry_key(index);
    env.storage().persistent().set(&key, checkpoint);
    extend_persistent_ttl(env, &key);
}
