use soroban_sdk::{Address, Env};

use crate::{
    errors::DaoTokenError,
    events::DaoTokenEvents,
    storage::{self, Checkpoint, CheckpointSeries},
};

/// Returns the value of the last checkpoint at or before `ledger`, or 0.
///
/// `checkpoint_at` yields the checkpoint at an index below `len`. Checkpoint
/// ledgers are strictly increasing, so this is an upper-bound binary search
/// touching O(log len) entries.
pub fn checkpoint_lookup<F>(len: u32, ledger: u32, checkpoint_at: F) -> i128
where
    F: Fn(u32) -> Checkpoint,
{
    let mut low = 0u32;
    let mut high = len;
    while low < high {
        let mid = low + (high - low) / 2;
        if checkpoint_at(mid).ledger > ledger {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    if high == 0 {
        0
    } else {
        checkpoint_at(high - 1).votes
    }
}

fn read_checkpoint(env: &Env, series: &CheckpointSeries, index: u32) -> Checkpoint {
    storage::get_checkpoint(env, series, index).unwrap_or(Checkpoint { ledger: 0, votes: 0 })
}

fn last_checkpoint(env: &Env, series: &CheckpointSeries) -> Option<(u32, Checkpoint)> {
    let count = storage::get_checkpoint_count(env, series);
    if count == 0 {
        return None;
    }
    storage::get_checkpoint(env, series, count - 1).map(|c| (count - 1, c))
}

fn latest(env: &Env, series: &CheckpointSeries) -> i128 {
    last_checkpoint(env, series).map(|(_, c)| c.votes).unwrap_or(0)
}

fn lookup(env: &Env, series: &CheckpointSeries, ledger: u32) -> Result<i128, DaoTokenError> {
    if ledger >= env.ledger().sequence() {
        return Err(DaoTokenError::FutureLookup);
    }
    let count = storage::get_checkpoint_count(env, series);
    Ok(checkpoint_lookup(count, ledger, |index| read_checkpoint(env, series, index)))
}

/// Records `value` at the current ledger. A second write in the same ledger
/// replaces the last checkpoint. Returns the previous latest value.
fn push_checkpoint(
    env: &Env,
    series: &CheckpointSeries,
    value: i128,
) -> Result<i128, DaoTokenError> {
    let ledger = env.ledger().sequence();
    let checkpoint = Checkpoint { ledger, votes: value };

    match last_checkpoint(env, series) {
        Some((index, last)) if last.ledger == ledger => {
            storage::set_checkpoint(env, series, index, &checkpoint);
            Ok(last.votes)
        }
        last => {
            let count = storage::get_checkpoint_count(env, series);
            storage::set_checkpoint(env, series, count, &checkpoint);
            let next = count.checked_add(1).ok_or(DaoTokenError::Overflow)?;
            storage::set_checkpoint_count(env, series, next);
            Ok(last.map(|(_, c)| c.votes).unwrap_or(0))
        }
    }
}

pub fn get_votes(env: &Env, account: &Address) -> i128 {
    latest(env, &CheckpointSeries::Account(account.clone()))
}

pub fn get_past_votes(env: &Env, account: &Address, ledger: u32) -> Result<i128, DaoTokenError> {
    lookup(env, &CheckpointSeries::Account(account.clone()), ledger)
}

pub fn get_past_total_supply(env: &Env, ledger: u32) -> Result<i128, DaoTokenError> {
    lookup(env, &CheckpointSeries::Supply, ledger)
}

pub fn num_checkpoints(env: &Env, account: &Address) -> u32 {
    storage::get_checkpoint_count(env, &CheckpointSeries::Account(account.clone()))
}

pub fn record_total_supply(env: &Env, total_supply: i128) -> Result<(), DaoTokenError> {
    push_checkpoint(env, &CheckpointSeries::Supply, total_supply)?;
    Ok(())
}

/// Moves `amount` of voting power from one delegate to another. `None` on
/// either side means the tokens were minted, burned, or held undelegated.
pub fn move_voting_power(
    env: &Env,
    from: &Option<Address>,
    to: &Option<Address>,
    amount: i128,
) -> Result<(), DaoTokenError> {
    if amount == 0 || from == to {
        return Ok(());
    }

    if let Some(from) = from {
        let current = get_votes(env, from);
        let new_votes = current.checked_sub(amount).ok_or(DaoTokenError::Overflow)?;
        if new_votes < 0 {
            return Err(DaoTokenError::InsufficientBalance);
        }
        let previous =
            push_checkpoint(env, &CheckpointSeries::Account(from.clone()), new_votes)?;
        DaoTokenEvents::votes_changed(env, from, previous, new_votes);
    }

    if let Some(to) = to {
        let current = get_votes(env, to);
        let new_votes = current.checked_add(amount).ok_or(DaoTokenError::Overflow)?;
        let previous = push_checkpoint(env, &CheckpointSeries::Account(to.clone()), new_votes)?;
        DaoTokenEvents::votes_changed(env, to, previous, new_votes);
    }

    Ok(())
}

/// Points `delegator`'s voting power at `delegatee`, carrying its full
/// current balance over from the previous delegate.
pub fn delegate(env: &Env, delegator: &Address, delegatee: &Address) -> Result<(), DaoTokenError> {
    let previous = storage::get_delegate(env, delegator);
    storage::set_delegate(env, delegator, delegatee);
    DaoTokenEvents::delegate_changed(env, delegator, &previous, delegatee);

    let balance = storage::get_balance(env, delegator);
    move_voting_power(env, &previous, &Some(delegatee.clone()), balance)
}
