use soroban_sdk::{symbol_short, Address, Env};

pub struct DaoTokenEvents;

impl DaoTokenEvents {
    /// Emits a `del_chg` event when an account changes its delegate.
    ///
    /// Topics: `("del_chg", delegator)`
    /// Data:   `(from_delegate, to_delegate)`
    pub fn delegate_changed(
        env: &Env,
        delegator: &Address,
        from_delegate: &Option<Address>,
        to_delegate: &Address,
    ) {
        env.events().publish(
            (symbol_short!("del_chg"), delegator.clone()),
            (from_delegate.clone(), to_delegate.clone()),
        );
    }

    /// Emits a `votes` event whenever a delegate's voting power moves.
    ///
    /// Topics: `("votes", delegate)`
    /// Data:   `(previous_votes, new_votes)`
    pub fn votes_changed(env: &Env, delegate: &Address, previous_votes: i128, new_votes: i128) {
        env.events().publish((symbol_short!("votes"), delegate.clone()), (previous_votes, new_votes));
    }
}
