// Copyright (c) 2024-present, arana-db Community.  All rights reserved.
//
// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Multi-hop transactions over the shard set.
//!
//! `schedule` reserves a queue slot on every implicated shard; `execute`
//! runs one hop and blocks until all shards ran it. Between a
//! non-concluding hop and the next one no other scheduled transaction can
//! touch the implicated shards, which is what the two-hop commands
//! (SMOVE, the store variants) rely on for atomicity.

use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};

use bytes::Bytes;
use log::error;
use parking_lot::{Condvar, Mutex};
use store::{OpResult, OpStatus};

use crate::shard::{EngineShard, ShardId};
use crate::shard_set::ShardSet;

pub(crate) type HopCb = Box<dyn FnOnce(&TxContext, &mut EngineShard) -> OpResult<()> + Send>;

pub(crate) struct Hop {
    pub(crate) cb: HopCb,
    pub(crate) concluding: bool,
    pub(crate) barrier: Arc<HopBarrier>,
}

/// Count-down latch the coordinator blocks on between hops.
pub(crate) struct HopBarrier {
    remaining: Mutex<usize>,
    cv: Condvar,
}

impl HopBarrier {
    fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            cv: Condvar::new(),
        }
    }

    pub(crate) fn arrive(&self) {
        let mut remaining = self.remaining.lock();
        *remaining -= 1;
        if *remaining == 0 {
            self.cv.notify_all();
        }
    }

    fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.cv.wait(&mut remaining);
        }
    }
}

/// Read-only transaction state visible to shard callbacks.
pub struct TxContext {
    db_index: usize,
    shard_args: Vec<Vec<Bytes>>,
    unique_shards: Vec<ShardId>,
}

impl TxContext {
    pub fn db_index(&self) -> usize {
        self.db_index
    }

    /// The command's key arguments routed to `shard_id`, original order
    /// preserved.
    pub fn shard_args_in_shard(&self, shard_id: ShardId) -> &[Bytes] {
        &self.shard_args[shard_id]
    }

    /// Number of shards holding at least one argument key.
    pub fn unique_shard_cnt(&self) -> usize {
        self.unique_shards.len()
    }

    pub fn unique_shards(&self) -> &[ShardId] {
        &self.unique_shards
    }
}

pub struct Transaction {
    ctx: Arc<TxContext>,
    shard_set: Arc<ShardSet>,
    hop_txs: Vec<Option<Sender<Hop>>>,
    txid: u64,
    scheduled: bool,
    concluded: bool,
}

impl Transaction {
    pub fn new(shard_set: &Arc<ShardSet>, db_index: usize, keys: &[Bytes]) -> Self {
        let shards = shard_set.size();
        let mut shard_args = vec![Vec::new(); shards];
        for key in keys {
            shard_args[shard_set.shard_of(key)].push(key.clone());
        }
        let unique_shards = (0..shards).filter(|&sid| !shard_args[sid].is_empty()).collect();

        Self {
            ctx: Arc::new(TxContext {
                db_index,
                shard_args,
                unique_shards,
            }),
            shard_set: shard_set.clone(),
            hop_txs: vec![None; shards],
            txid: 0,
            scheduled: false,
            concluded: false,
        }
    }

    pub fn ctx(&self) -> &TxContext {
        &self.ctx
    }

    pub fn unique_shard_cnt(&self) -> usize {
        self.ctx.unique_shard_cnt()
    }

    pub fn txid(&self) -> u64 {
        self.txid
    }

    /// Reserve this transaction's slot on every implicated shard.
    ///
    /// Enqueueing happens under the set-wide schedule lock, so per-shard
    /// arrival order equals global txid order and cross-shard waits can
    /// never form a cycle.
    pub fn schedule(&mut self) {
        debug_assert!(!self.scheduled);
        let _order = self.shard_set.schedule_order();
        self.txid = self.shard_set.next_txid();
        for &sid in self.ctx.unique_shards() {
            let (hop_tx, hop_rx) = channel();
            self.shard_set.enqueue(sid, self.ctx.clone(), hop_rx);
            self.hop_txs[sid] = Some(hop_tx);
        }
        self.scheduled = true;
    }

    /// Run one hop on every implicated shard and wait for all of them.
    /// A non-concluding hop keeps the transaction at the head of each
    /// shard's queue until the concluding one runs.
    pub fn execute<F>(&mut self, cb: F, concluding: bool)
    where
        F: Fn(&TxContext, &mut EngineShard) -> OpResult<()> + Send + Sync + 'static,
    {
        debug_assert!(self.scheduled && !self.concluded);
        let cb = Arc::new(cb);
        let barrier = Arc::new(HopBarrier::new(self.ctx.unique_shard_cnt()));
        for &sid in self.ctx.unique_shards() {
            let cb = cb.clone();
            let hop = Hop {
                cb: Box::new(move |ctx: &TxContext, shard: &mut EngineShard| cb(ctx, shard)),
                concluding,
                barrier: barrier.clone(),
            };
            let sent = match &self.hop_txs[sid] {
                Some(hop_tx) => hop_tx.send(hop).is_ok(),
                None => false,
            };
            if !sent {
                // shard thread is gone; count it down or the hop never ends
                barrier.arrive();
            }
        }
        barrier.wait();

        if concluding {
            self.concluded = true;
            for hop_tx in &mut self.hop_txs {
                *hop_tx = None;
            }
        }
    }

    /// Schedule plus a single concluding hop.
    pub fn schedule_single_hop<F>(&mut self, cb: F)
    where
        F: Fn(&TxContext, &mut EngineShard) -> OpResult<()> + Send + Sync + 'static,
    {
        self.schedule();
        self.execute(cb, true);
    }

    /// Single concluding hop returning the typed result of the one
    /// implicated shard.
    pub fn schedule_single_hop_t<T, F>(&mut self, cb: F) -> OpResult<T>
    where
        T: Send + 'static,
        F: Fn(&TxContext, &mut EngineShard) -> OpResult<T> + Send + Sync + 'static,
    {
        debug_assert_eq!(self.unique_shard_cnt(), 1);
        let slot: Arc<Mutex<Option<OpResult<T>>>> = Arc::new(Mutex::new(None));
        let out = slot.clone();
        self.schedule_single_hop(move |ctx, shard| {
            *out.lock() = Some(cb(ctx, shard));
            Ok(())
        });

        let result = slot.lock().take();
        result.unwrap_or(Err(OpStatus::Unexpected))
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        // every path must conclude, even after an error between hops
        if self.scheduled && !self.concluded {
            error!("transaction dropped without a concluding hop");
        }
    }
}

/// Concluding hop that does nothing. Error paths discovered between hops
/// schedule it so the transaction's queue slots are still released.
pub fn no_op_cb(_ctx: &TxContext, _shard: &mut EngineShard) -> OpResult<()> {
    Ok(())
}
