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

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use conf::Config;
use log::debug;
use parking_lot::{Mutex, MutexGuard};
use snafu::ResultExt;

use crate::error::{Result, ThreadSpawnSnafu};
use crate::shard::{EngineShard, ShardId};
use crate::transaction::{Hop, TxContext};

pub(crate) enum ShardMsg {
    Enqueue(Arc<TxContext>, Receiver<Hop>),
    Shutdown,
}

/// The set of shard threads plus the global transaction ordering state.
pub struct ShardSet {
    senders: Vec<Sender<ShardMsg>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    schedule_lock: Mutex<()>,
    next_txid: AtomicU64,
}

impl ShardSet {
    /// Spawn one owning thread per shard.
    pub fn new(config: &Config) -> Result<Arc<Self>> {
        let mut senders = Vec::with_capacity(config.shard_num);
        let mut handles = Vec::with_capacity(config.shard_num);

        for shard_id in 0..config.shard_num {
            let (tx, rx) = channel();
            let mut shard =
                EngineShard::new(shard_id, config.databases, config.max_intset_entries());
            let handle = std::thread::Builder::new()
                .name(format!("shard-{shard_id}"))
                .spawn(move || run_shard(&mut shard, &rx))
                .context(ThreadSpawnSnafu)?;
            senders.push(tx);
            handles.push(handle);
        }

        Ok(Arc::new(Self {
            senders,
            handles: Mutex::new(handles),
            schedule_lock: Mutex::new(()),
            next_txid: AtomicU64::new(1),
        }))
    }

    pub fn size(&self) -> usize {
        self.senders.len()
    }

    /// Owning shard for a key; stable for the life of a transaction.
    pub fn shard_of(&self, key: &[u8]) -> ShardId {
        if self.senders.len() <= 1 {
            return 0;
        }
        (hash(key) % self.senders.len() as u64) as ShardId
    }

    pub(crate) fn schedule_order(&self) -> MutexGuard<'_, ()> {
        self.schedule_lock.lock()
    }

    pub(crate) fn next_txid(&self) -> u64 {
        self.next_txid.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn enqueue(&self, shard_id: ShardId, ctx: Arc<TxContext>, hop_rx: Receiver<Hop>) {
        let _ = self.senders[shard_id].send(ShardMsg::Enqueue(ctx, hop_rx));
    }
}

impl Drop for ShardSet {
    fn drop(&mut self) {
        for tx in &self.senders {
            let _ = tx.send(ShardMsg::Shutdown);
        }
        for handle in self.handles.lock().drain(..) {
            let _ = handle.join();
        }
    }
}

fn run_shard(shard: &mut EngineShard, rx: &Receiver<ShardMsg>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            ShardMsg::Enqueue(ctx, hop_rx) => {
                // run the queue-head transaction's hops to conclusion; a
                // dropped sender unblocks us the same way a concluding hop
                // does
                while let Ok(hop) = hop_rx.recv() {
                    if let Err(status) = (hop.cb)(&ctx, shard) {
                        debug!("shard {} hop status: {status}", shard.shard_id());
                    }
                    let concluding = hop.concluding;
                    hop.barrier.arrive();
                    if concluding {
                        break;
                    }
                }
            }
            ShardMsg::Shutdown => break,
        }
    }
}

// djb2-style byte hash
fn hash(key: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &byte in key {
        hash = hash
            .wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u64::from(byte));
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_of_stable() {
        let config = Config::default();
        let shard_set = ShardSet::new(&config).unwrap();
        let sid = shard_set.shard_of(b"key1");
        assert!(sid < shard_set.size());
        assert_eq!(sid, shard_set.shard_of(b"key1"));
    }

    #[test]
    fn test_single_shard_maps_to_zero() {
        let config = Config {
            shard_num: 1,
            ..Config::default()
        };
        let shard_set = ShardSet::new(&config).unwrap();
        assert_eq!(shard_set.shard_of(b"anything"), 0);
    }
}
