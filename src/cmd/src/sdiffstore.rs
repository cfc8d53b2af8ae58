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

use bytes::Bytes;
use client::Client;
use engine::{ShardSet, Transaction, no_op_cb};
use log::error;
use resp::RespData;
use store::{op_add, op_diff, op_union};

use crate::combine::{self, new_result_set};
use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

#[derive(Clone, Default)]
pub struct SdiffstoreCmd {
    meta: CmdMeta,
}

impl SdiffstoreCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "sdiffstore".to_string(),
                arity: -3, // SDIFFSTORE destination srckey [key ...]
                flags: CmdFlags::WRITE | CmdFlags::DENYOOM,
                acl_category: AclCategory::SET | AclCategory::WRITE | AclCategory::SLOW,
                ..Default::default()
            },
        }
    }
}

impl Cmd for SdiffstoreCmd {
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
        let src = argv[2].clone();
        let keys: Vec<Bytes> = argv[1..].to_vec();
        let dest_shard = shard_set.shard_of(&dest);
        let src_shard = shard_set.shard_of(&src);

        let mut tx = Transaction::new(&shard_set, client.db_index(), &keys);
        let results = new_result_set(shard_set.size());

        tx.schedule();

        let out = results.clone();
        let dest_arg = dest.clone();
        tx.execute(
            move |ctx, shard| {
                let sid = shard.shard_id();
                let mut largs = ctx.shard_args_in_shard(sid);
                if sid == dest_shard {
                    debug_assert_eq!(largs[0], dest_arg);
                    largs = &largs[1..];
                    if largs.is_empty() {
                        return Ok(());
                    }
                }
                let db = shard.db_slice(ctx.db_index());
                out.lock()[sid] = if sid == src_shard {
                    op_diff(db, largs)
                } else {
                    op_union(db, largs)
                };
                Ok(())
            },
            false,
        );

        let combined = combine::diff_result_vec(&results.lock(), src_shard);
        let members: Vec<Bytes> = match combined {
            Ok(members) => members.into_iter().collect(),
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
                        error!("storing difference result failed: {status}");
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
    fn test_sdiffstore_cmd_meta() {
        let cmd = SdiffstoreCmd::new();
        assert_eq!(cmd.name(), "sdiffstore");
        assert_eq!(cmd.meta().arity, -3);
        assert!(cmd.has_flag(CmdFlags::WRITE));
    }
}
