#![cfg(test)]


use crate::{DaoToken, DaoTokenClient, DaoTokenError};
use soroban_sdk::{
    symbol_short,
    testutils::{
        storage::Instance as _, Address as _, AuthorizedFunction, AuthorizedInvocation, Ledger,
    },
    Address, Env, IntoVal, String,
};

fn deploy<'a>(env: &Env, initial_supply: i128) -> (DaoTokenClient<'a>, Address) {
    let contract_id = env.register_contract(None, DaoToken);
    let client = DaoTokenClient::new(env, &contract_id);
    let admin = Address::generate(env);
    client.initialize(&admin, &initial_supply);
    (client, admin)
}

// ---------- Deployment ----------

#[test]
fn name_is_dao_token_after_deploy_with_200() {
    let env = Env::default();
    let (token, _) = deploy(&env, 200);

    assert_eq!(token.name(), String::from_str(&env, "DAO Token"));
}

#[test]
fn deploy_sets_metadata_and_mints_to_admin() {
    let env = Env::default();
    let (token, admin) = deploy(&env, 200);

    assert_eq!(token.symbol(), String::from_str(&env, "DAO"));
    assert_eq!(token.decimals(), 7);
    assert_eq!(token.admin(), admin);
    assert_eq!(token.balance(&admin), 200);
    assert_eq!(token.total_supply(), 200);
}

#[test]
fn deploy_with_zero_supply_succeeds() {
    let env = Env::default();
    let (token, admin) = deploy(&env, 0);

    assert_eq!(token.balance(&admin), 0);
    assert_eq!(token.total_supply(), 0);
}

#[test]
fn double_initialize_fails() {
    let env = Env::default();
    let (token, _) = deploy(&env, 200);
    let other = Address::generate(&env);

    let result = token.try_initialize(&other, &200);
    assert_eq!(result, Err(Ok(DaoTokenError::AlreadyInitialized)));
}

#[test]
fn negative_initial_supply_fails() {
    let env = Env::default();
    let contract_id = env.register_contract(None, DaoToken);
    let token = DaoTokenClient::new(&env, &contract_id);
    let admin = Address::generate(&env);

    let result = token.try_initialize(&admin, &-1);
    assert_eq!(result, Err(Ok(DaoTokenError::NegativeAmount)));
}

#[test]
fn admin_before_initialize_fails() {
    let env = Env::default();
    let contract_id = env.register_contract(None, DaoToken);
    let token = DaoTokenClient::new(&env, &contract_id);

    assert_eq!(token.try_admin(), Err(Ok(DaoTokenError::NotInitialized)));
}

#[test]
fn read_only_calls_extend_instance_ttl() {
    let env = Env::default();
    let (token, _) = deploy(&env, 200);

    // Past the lifetime threshold, any entry point bumps the instance back up.
    env.ledger().set_sequence_number(510_000);
    let instance_ttl = || env.as_contract(&token.address, || env.storage().instance().get_ttl());
    assert!(instance_ttl() < 17_280);

    token.total_supply();
    assert_eq!(instance_ttl(), 518_400);
}

// ---------- Admin ----------

#[test]
fn admin_mint_increases_balance_and_supply() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, _) = deploy(&env, 200);
    let user = Address::generate(&env);

    token.mint(&user, &50);

    assert_eq!(token.balance(&user), 50);
    assert_eq!(token.total_supply(), 250);
}

#[test]
#[should_panic]
fn mint_without_admin_auth_panics() {
    let env = Env::default();
    let (token, _) = deploy(&env, 200);
    let user = Address::generate(&env);

    token.mint(&user, &50);
}

#[test]
fn set_admin_transfers_mint_rights() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, _) = deploy(&env, 200);
    let new_admin = Address::generate(&env);

    token.set_admin(&new_admin);
    assert_eq!(token.admin(), new_admin);

    let user = Address::generate(&env);
    token.mint(&user, &25);

    // Only the new admin signs for the mint.
    assert_eq!(
        env.auths(),
        std::vec![(
            new_admin.clone(),
            AuthorizedInvocation {
                function: AuthorizedFunction::Contract((
                    token.address.clone(),
                    symbol_short!("mint"),
                    (user.clone(), 25_i128).into_val(&env),
                )),
                sub_invocations: std::vec![],
            }
        )]
    );
    assert_eq!(token.balance(&user), 25);
}

#[test]
fn mint_past_max_supply_overflows() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);

    let result = token.try_mint(&admin, &i128::MAX);
    assert_eq!(result, Err(Ok(DaoTokenError::Overflow)));
    assert_eq!(token.total_supply(), 200);
    assert_eq!(token.balance(&admin), 200);
}

// ---------- Transfers ----------

#[test]
fn transfer_moves_balance() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);
    let user = Address::generate(&env);

    token.transfer(&admin, &user, &75);

    assert_eq!(token.balance(&admin), 125);
    assert_eq!(token.balance(&user), 75);
    assert_eq!(token.total_supply(), 200);
}

#[test]
fn transfer_more_than_balance_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);
    let user = Address::generate(&env);

    let result = token.try_transfer(&admin, &user, &201);
    assert_eq!(result, Err(Ok(DaoTokenError::InsufficientBalance)));
    assert_eq!(token.balance(&admin), 200);
}

#[test]
fn negative_transfer_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);
    let user = Address::generate(&env);

    let result = token.try_transfer(&admin, &user, &-5);
    assert_eq!(result, Err(Ok(DaoTokenError::NegativeAmount)));
}

#[test]
fn transfer_to_self_keeps_balance() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);

    token.transfer(&admin, &admin, &200);
    assert_eq!(token.balance(&admin), 200);
}

// ---------- Allowances ----------

#[test]
fn approve_and_transfer_from_spends_allowance() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);
    let spender = Address::generate(&env);
    let recipient = Address::generate(&env);

    token.approve(&admin, &spender, &100, &1_000);
    assert_eq!(token.allowance(&admin, &spender), 100);

    token.transfer_from(&spender, &admin, &recipient, &60);

    assert_eq!(token.allowance(&admin, &spender), 40);
    assert_eq!(token.balance(&admin), 140);
    assert_eq!(token.balance(&recipient), 60);
}

#[test]
fn transfer_from_over_allowance_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);
    let spender = Address::generate(&env);
    let recipient = Address::generate(&env);

    token.approve(&admin, &spender, &10, &1_000);

    let result = token.try_transfer_from(&spender, &admin, &recipient, &11);
    assert_eq!(result, Err(Ok(DaoTokenError::InsufficientAllowance)));
}

#[test]
fn approve_with_past_expiration_fails() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(100);
    let (token, admin) = deploy(&env, 200);
    let spender = Address::generate(&env);

    let result = token.try_approve(&admin, &spender, &10, &99);
    assert_eq!(result, Err(Ok(DaoTokenError::InvalidExpiration)));

    // Zero allowances may carry any expiration.
    token.approve(&admin, &spender, &0, &0);
    assert_eq!(token.allowance(&admin, &spender), 0);
}

#[test]
fn expired_allowance_reads_as_zero() {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);
    let (token, admin) = deploy(&env, 200);
    let spender = Address::generate(&env);

    token.approve(&admin, &spender, &50, &20);
    assert_eq!(token.allowance(&admin, &spender), 50);

    env.ledger().set_sequence_number(21);
    assert_eq!(token.allowance(&admin, &spender), 0);
}

// ---------- Burning ----------

#[test]
fn burn_reduces_balance_and_supply() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);

    token.burn(&admin, &30);

    assert_eq!(token.balance(&admin), 170);
    assert_eq!(token.total_supply(), 170);
}

#[test]
fn burn_from_spends_allowance() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);
    let spender = Address::generate(&env);

    token.approve(&admin, &spender, &40, &1_000);
    token.burn_from(&spender, &admin, &40);

    assert_eq!(token.allowance(&admin, &spender), 0);
    assert_eq!(token.balance(&admin), 160);
    assert_eq!(token.total_supply(), 160);
}

#[test]
fn burn_more_than_balance_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let (token, admin) = deploy(&env, 200);

    let result = token.try_burn(&admin, &500);
    assert_eq!(result, Err(Ok(DaoTokenError::InsufficientBalance)));
    assert_eq!(token.total_supply(), 200);
}
