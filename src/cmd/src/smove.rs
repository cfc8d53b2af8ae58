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

//! SMOVE and its two-hop coordinator.
//!
//! The find hop records, without mutating anything, whether the member is
//! in the source and whether the destination is usable. The decision runs
//! on the caller thread while the transaction is still scheduled, so the
//! mutate hop (or a no-op on the reject paths) applies it atomically.

use std::sync::Arc;

use bytes::Bytes;
use client::Client;
use engine::{EngineShard, ShardSet, Transaction, TxContext, no_op_cb};
use parking_lot::Mutex;
use resp::RespData;
use store::{DataType, OpResult, OpStatus, op_add, op_rem};

use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

/// Two-step SMOVE coordinator: `find` (non-concluding) then `commit`
/// (concluding, possibly a no-op).
pub struct Mover {
    src: Bytes,
    dest: Bytes,
    member: Bytes,
    // found[0] = member in src, found[1] = dest usable
    found: Mutex<[OpResult<bool>; 2]>,
}

impl Mover {
    pub fn new(src: Bytes, dest: Bytes, member: Bytes) -> Arc<Self> {
        Arc::new(Self {
            src,
            dest,
            member,
            found: Mutex::new([Ok(false), Ok(false)]),
        })
    }

    fn op_find(&self, ctx: &TxContext, shard: &mut EngineShard) -> OpResult<()> {
        // src and dest may co-locate, in which case this shard sees both
        let largs = ctx.shard_args_in_shard(shard.shard_id());
        let db = shard.db_slice(ctx.db_index());
        let mut found = self.found.lock();

        for key in largs {
            let index = usize::from(key != &self.src);
            found[index] = match db.find(key, DataType::Set) {
                Ok(obj) => {
                    if index == 0 {
                        Ok(obj.as_set().is_some_and(|s| s.is_member(&self.member)))
                    } else {
                        Ok(true)
                    }
                }
                Err(status) => Err(status),
            };
        }

        Ok(())
    }

    fn op_mutate(&self, ctx: &TxContext, shard: &mut EngineShard) -> OpResult<()> {
        let largs = ctx.shard_args_in_shard(shard.shard_id());
        let member = std::slice::from_ref(&self.member);

        for key in largs {
            let mut op_args = shard.op_args(ctx.db_index());
            if key == &self.src {
                // the find hop proved membership and nothing interleaved
                op_rem(&mut op_args, key, member)?;
            } else {
                op_add(&mut op_args, key, member, false)?;
            }
        }

        Ok(())
    }

    /// Non-concluding find hop.
    pub fn find(self: &Arc<Self>, tx: &mut Transaction) {
        let mover = Arc::clone(self);
        tx.execute(move |ctx, shard| mover.op_find(ctx, shard), false);
    }

    /// Decide and run the concluding hop. Reject paths still conclude so
    /// the transaction queue advances.
    pub fn commit(self: &Arc<Self>, tx: &mut Transaction) -> OpResult<u32> {
        let found = *self.found.lock();

        let (result, noop) = if found.contains(&Err(OpStatus::WrongType)) {
            (Err(OpStatus::WrongType), true)
        } else if !found[0].unwrap_or(false) {
            (Ok(0), true)
        } else {
            (Ok(1), self.src == self.dest)
        };

        if noop {
            tx.execute(no_op_cb, true);
        } else {
            let mover = Arc::clone(self);
            tx.execute(move |ctx, shard| mover.op_mutate(ctx, shard), true);
        }

        result
    }
}

#[derive(Clone, Default)]
pub struct SmoveCmd {
    meta: CmdMeta,
}

impl SmoveCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "smove".to_string(),
                arity: 4, // SMOVE source destination member
                flags: CmdFlags::WRITE | CmdFlags::FAST,
                acl_category: AclCategory::SET | AclCategory::WRITE | AclCategory::FAST,
                ..Default::default()
            },
        }
    }
}

impl Cmd for SmoveCmd {
    impl_cmd_meta!();
    impl_cmd_clone_box!();

    fn do_initial(&self, client: &Client) -> bool {
        let argv = client.argv();
        client.set_key(&argv[1]);
        true
    }

    fn do_cmd(&self, client: &Client, shard_set: Arc<ShardSet>) {
        let argv = client.argv();
        let src = argv[1].clone();
        let dest = argv[2].clone();
        let member = argv[3].clone();

        let mut tx = Transaction::new(
            &shard_set,
            client.db_index(),
            &[src.clone(), dest.clone()],
        );
        tx.schedule();

        let mover = Mover::new(src, dest, member);
        mover.find(&mut tx);

        match mover.commit(&mut tx) {
            Ok(moved) => client.set_reply(RespData::Integer(i64::from(moved))),
            Err(status) => crate::reply_error(client, status),
        }
    }
}
