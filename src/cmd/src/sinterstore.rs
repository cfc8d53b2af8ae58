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
use std::sync::atomic::{AtomicU32, Ordering};

use bytes::Bytes;
use client::Client;
use engine::{ShardSet, Transaction, no_op_cb};
use log::error;
use resp::RespData;
use store::{op_add, op_inter};

use crate::combine::{self, new_result_set};
use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

#[derive(Clone, Default)]
pub struct SinterstoreCmd {
    meta: CmdMeta,
}

impl SinterstoreCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "sinterstore".to_string(),
                arity: -3, // SINTERSTORE destination key [key ...]
                flags: CmdFlags::WRITE | CmdFlags::DENYOOM,
                acl_category: AclCategory::SET | AclCategory::WRITE | AclCategory::SLOW,
                ..Default::default()
            },
        }
    }
}

impl Cmd for SinterstoreCmd {
    impl_cmd_meta!();
    impl_cmd_clone_box!();

    fn do_initial(&self, client: &Client) -> bool {
        let argv = client.argv();
        client.set_key(&argv[1]);
        true
    }

    fn do_cmd(&self, client: &Client, shard_set: Arc<ShardSet>) {
        let argv = client.argv();
        let dest = argv[1].clone();
        let keys: Vec<Bytes> = argv[1..].to_vec();
        let dest_shard = shard_set.shard_of(&dest);

        let mut tx = Transaction::new(&shard_set, client.db_index(), &keys);
        let results = new_result_set(shard_set.size());
        // the destination shard may hold only the dest key and then skips,
        // so the contributor count is discovered while the hop runs
        let inter_shard_cnt = Arc::new(AtomicU32::new(0));

        tx.schedule();

        let out = results.clone();
        let cnt = inter_shard_cnt.clone();
        let dest_arg = dest.clone();
        tx.execute(
            move |ctx, shard| {
                let sid = shard.shard_id();
                let largs = ctx.shard_args_in_shard(sid);
                if sid == dest_shard {
                    debug_assert_eq!(largs[0], dest_arg);
                    if largs.len() == 1 {
                        return Ok(());
                    }
                }
                cnt.fetch_add(1, Ordering::Relaxed);
                out.lock()[sid] =
                    op_inter(shard.db_slice(ctx.db_index()), largs, sid == dest_shard);
                Ok(())
            },
            false,
        );

        let required = inter_shard_cnt.load(Ordering::Relaxed) as usize;
        let combined = combine::inter_result_vec(&results.lock(), required);
        let members = match combined {
            Ok(members) => members,
            Err(status) => {
                tx.execute(no_op_cb, true);
                crate::reply_error(client, status);
                return;
            }
        };

        let stored = members.len();
        tx.execute(
            move |ctx, shard| {
                if shard.shard_id() == dest_shard {
                    let mut op_args = shard.op_args(ctx.db_index());
                    if let Err(status) = op_add(&mut op_args, &dest, &members, true) {
                        error!("storing intersection result failed: {status}");
                    }
                }
                Ok(())
            },
            true,
        );

        client.set_reply(RespData::Integer(stored as i64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sinterstore_cmd_meta() {
        let cmd = SinterstoreCmd::new();
        assert_eq!(cmd.name(), "sinterstore");
        assert_eq!(cmd.meta().arity, -3);
        assert!(cmd.has_flag(CmdFlags::WRITE));
    }
}
