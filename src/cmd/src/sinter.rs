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
use engine::{ShardSet, Transaction};
use store::op_inter;

use crate::combine::{self, new_result_set};
use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

#[derive(Clone, Default)]
pub struct SinterCmd {
    meta: CmdMeta,
}

impl SinterCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "sinter".to_string(),
                arity: -2, // SINTER key [key ...]
                flags: CmdFlags::READONLY,
                acl_category: AclCategory::SET | AclCategory::READ | AclCategory::SLOW,
                ..Default::default()
            },
        }
    }
}

impl Cmd for SinterCmd {
    impl_cmd_meta!();
    impl_cmd_clone_box!();

    fn do_initial(&self, client: &Client) -> bool {
        let argv = client.argv();
        client.set_key(&argv[1]);
        true
    }

    fn do_cmd(&self, client: &Client, shard_set: Arc<ShardSet>) {
        let argv = client.argv();
        let keys: Vec<Bytes> = argv[1..].to_vec();

        let mut tx = Transaction::new(&shard_set, client.db_index(), &keys);
        let results = new_result_set(shard_set.size());

        let out = results.clone();
        tx.schedule_single_hop(move |ctx, shard| {
            let sid = shard.shard_id();
            let largs = ctx.shard_args_in_shard(sid);
            out.lock()[sid] = op_inter(shard.db_slice(ctx.db_index()), largs, false);
            Ok(())
        });

        // every implicated shard contributed
        let combined = combine::inter_result_vec(&results.lock(), tx.unique_shard_cnt());
        match combined {
            Ok(members) => crate::reply_member_array(client, members),
            Err(status) => crate::reply_error(client, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sinter_cmd_meta() {
        let cmd = SinterCmd::new();
        assert_eq!(cmd.name(), "sinter");
        assert_eq!(cmd.meta().arity, -2);
        assert!(cmd.has_flag(CmdFlags::READONLY));
    }
}
