#![cfg_attr(not(test), no_std)]

mod errors;
mod events;
mod storage;
mod votes;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod test;

pub use errors::DaoTokenError;
use soroban_sdk::{contract, contractimpl, Address, Env, String};
use soroban_token_sdk::TokenUtils;
use storage::AllowanceEntry;

fn check_nonnegative_amount(amount: i128) -> Result<(), DaoTokenError> {
    if amount < 0 {
        return Err(DaoTokenError::NegativeAmount);
    }
    Ok(())
}

fn receive_balance(env: &Env, to: &Address, amount: i128) -> Result<(), DaoTokenError> {
    let balance = storage::get_balance(env, to);
    let new_balance = balance.checked_add(amount).ok_or(DaoTokenError::Overflow)?;
    storage::set_balance(env, to, new_balance);
    Ok(())
}

fn spend_balance(env: &Env, from: &Address, amount: i128) -> Result<(), DaoTokenError> {
    let balance = storage::get_balance(env, from);
    if balance < amount {
        return Err(DaoTokenError::InsufficientBalance);
    }
    storage::set_balance(env, from, balance - amount);
    Ok(())
}

fn spend_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), DaoTokenError> {
    let allowance = storage::get_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(DaoTokenError::InsufficientAllowance);
    }
    if amount > 0 {
        storage::set_allowance(
            env,
            from,
            spender,
            &AllowanceEntry {
                amount: allowance.amount - amount,
                expiration_ledger: allowance.expiration_ledger,
            },
        );
    }
    Ok(())
}

/// Balance movement shared by transfer paths, mint and burn. `None` marks
/// the supply side of a mint or burn. Voting power follows the tokens
/// between the delegates of each side.
fn update(
    env: &Env,
    from: Option<&Address>,
    to: Option<&Address>,
    amount: i128,
) -> Result<(), DaoTokenError> {
    let mut supply = storage::get_total_supply(env);

    match from {
        Some(from) => spend_balance(env, from, amount)?,
        None => supply = supply.checked_add(amount).ok_or(DaoTokenError::Overflow)?,
    }
    match to {
        Some(to) => receive_balance(env, to, amount)?,
        None => supply = supply.checked_sub(amount).ok_or(DaoTokenError::Overflow)?,
    }

    if from.is_none() || to.is_none() {
        storage::set_total_supply(env, supply);
        votes::record_total_supply(env, supply)?;
    }

    let from_delegate = from.and_then(|a| storage::get_delegate(env, a));
    let to_delegate = to.and_then(|a| storage::get_delegate(env, a));
    votes::move_voting_power(env, &from_delegate, &to_delegate, amount)
}

fn read_admin(env: &Env) -> Result<Address, DaoTokenError> {
    storage::get_admin(env).ok_or(DaoTokenError::NotInitialized)
}

#[contract]
pub struct DaoToken;

#[contractimpl]
impl DaoToken {
    /// Deploy-time setup: fixes metadata and mints `initial_supply` to `admin`.
    pub fn initialize(env: Env, admin: Address, initial_supply: i128) -> Result<(), DaoTokenError> {
        if storage::has_admin(&env) {
            return Err(DaoTokenError::AlreadyInitialized);
        }
        check_nonnegative_amount(initial_supply)?;

        storage::set_admin(&env, &admin);
        storage::write_metadata(&env);
        storage::extend_instance_ttl(&env);

        update(&env, None, Some(&admin), initial_supply)?;
        TokenUtils::new(&env).events().mint(admin.clone(), admin, initial_supply);
        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, DaoTokenError> {
        storage::extend_instance_ttl(&env);
        read_admin(&env)
    }

    pub fn mint(env: Env, to: Address, amount: i128) -> Result<(), DaoTokenError> {
        check_nonnegative_amount(amount)?;
        let admin = read_admin(&env)?;
        admin.require_auth();
        storage::extend_instance_ttl(&env);

        update(&env, None, Some(&to), amount)?;
        TokenUtils::new(&env).events().mint(admin, to, amount);
        Ok(())
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), DaoTokenError> {
        let admin = read_admin(&env)?;
        admin.require_auth();
        storage::extend_instance_ttl(&env);

        storage::set_admin(&env, &new_admin);
        TokenUtils::new(&env).events().set_admin(admin, new_admin);
        Ok(())
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        storage::extend_instance_ttl(&env);
        storage::get_allowance(&env, &from, &spender).amount
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), DaoTokenError> {
        from.require_auth();
        check_nonnegative_amount(amount)?;
        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            return Err(DaoTokenError::InvalidExpiration);
        }
        storage::extend_instance_ttl(&env);

        storage::set_allowance(&env, &from, &spender, &AllowanceEntry { amount, expiration_ledger });
        TokenUtils::new(&env).events().approve(from, spender, amount, expiration_ledger);
        Ok(())
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        storage::extend_instance_ttl(&env);
        storage::get_balance(&env, &id)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), DaoTokenError> {
        from.require_auth();
        check_nonnegative_amount(amount)?;
        storage::extend_instance_ttl(&env);

        update(&env, Some(&from), Some(&to), amount)?;
        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), DaoTokenError> {
        spender.require_auth();
        check_nonnegative_amount(amount)?;
        storage::extend_instance_ttl(&env);

        spend_allowance(&env, &from, &spender, amount)?;
        update(&env, Some(&from), Some(&to), amount)?;
        TokenUtils::new(&env).events().transfer(from, to, amount);
        Ok(())
    }

    pub fn burn(env: Env, from: Address, amount: i128) -> Result<(), DaoTokenError> {
        from.require_auth();
        check_nonnegative_amount(amount)?;
        storage::extend_instance_ttl(&env);

        update(&env, Some(&from), None, amount)?;
        TokenUtils::new(&env).events().burn(from, amount);
        Ok(())
    }

    pub fn burn_from(
        env: Env,
        spender: Address,
        from: Address,
        amount: i128,
    ) -> Result<(), DaoTokenError> {
        spender.require_auth();
        check_nonnegative_amount(amount)?;
        storage::extend_instance_ttl(&env);

        spend_allowance(&env, &from, &spender, amount)?;
        update(&env, Some(&from), None, amount)?;
        TokenUtils::new(&env).events().burn(from, amount);
        Ok(())
    }

    pub fn total_supply(env: Env) -> i128 {
        storage::extend_instance_ttl(&env);
        storage::get_total_supply(&env)
    }

    pub fn decimals(env: Env) -> u32 {
        storage::extend_instance_ttl(&env);
        storage::read_metadata(&env).decimal
    }

    pub fn name(env: Env) -> String {
        storage::extend_instance_ttl(&env);
        storage::read_metadata(&env).name
    }

    pub fn symbol(env: Env) -> String {
        storage::extend_instance_ttl(&env);
        storage::read_metadata(&env).symbol
    }

    pub fn delegate(env: Env, delegator: Address, delegatee: Address) -> Result<(), DaoTokenError> {
        delegator.require_auth();
        storage::extend_instance_ttl(&env);
        votes::delegate(&env, &delegator, &delegatee)
    }

    pub fn delegates(env: Env, account: Address) -> Option<Address> {
        storage::extend_instance_ttl(&env);
        storage::get_delegate(&env, &account)
    }

    pub fn get_votes(env: Env, account: Address) -> i128 {
        storage::extend_instance_ttl(&env);
        votes::get_votes(&env, &account)
    }

    pub fn get_past_votes(env: Env, account: Address, ledger: u32) -> Result<i128, DaoTokenError> {
        storage::extend_instance_ttl(&env);
        votes::get_past_votes(&env, &account, ledger)
    }

    pub fn get_past_total_supply(env: Env, ledger: u32) -> Result<i128, DaoTokenError> {
        storage::extend_instance_ttl(&env);
        votes::get_past_total_supply(&env, ledger)
    }

    pub fn num_checkpoints(env: Env, account: Address) -> u32 {
        storage::extend_instance_ttl(&env);
        votes::num_checkpoints(&env, &account)
    }
}
