// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::services::{BalanceQueryService, MintService, TokenQueryService};

#[derive(Clone)]
pub struct AppState {
    pub balances: Arc<BalanceQueryService>,
    pub tokens: Arc<TokenQueryService>,
    pub minter: Arc<MintService>,
}

impl AppState {
    pub fn new(
        balances: BalanceQueryService,
        tokens: TokenQueryService,
        minter: MintService,
    ) -> Self {
        Self {
            balances: Arc::new(balances),
            tokens: Arc::new(tokens),
            minter: Arc::new(minter),
        }
    }
}
