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
use resp::RespData;
use store::op_add;

use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

#[derive(Clone, Default)]
pub struct SaddCmd {
    meta: CmdMeta,
}

impl SaddCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "sadd".to_string(),
                arity: -3, // SADD key member [member ...]
                flags: CmdFlags::WRITE | CmdFlags::FAST | CmdFlags::DENYOOM,
                acl_category: AclCategory::SET | AclCategory::WRITE | AclCategory::FAST,
                ..Default::default()
            },
        }
    }
}

impl Cmd for SaddCmd {
    impl_cmd_meta!();
    impl_cmd_clone_box!();

    fn do_initial(&self, client: &Client) -> bool {
        let argv = client.argv();
        client.set_key(&argv[1]);
        true
    }

    fn do_cmd(&self, client: &Client, shard_set: Arc<ShardSet>) {
        let argv = client.argv();
        let key = argv[1].clone();
        let vals: Vec<Bytes> = argv[2..].to_vec();

        let mut tx = Transaction::new(&shard_set, client.db_index(), std::slice::from_ref(&key));
        let result = tx.schedule_single_hop_t(move |ctx, shard| {
            let mut op_args = shard.op_args(ctx.db_index());
            op_add(&mut op_args, &key, &vals, false)
        });

        match result {
            Ok(added) => client.set_reply(RespData::Integer(i64::from(added))),
            Err(status) => crate::reply_error(client, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sadd_cmd_meta() {
        let cmd = SaddCmd::new();
        assert_eq!(cmd.name(), "sadd");
        assert_eq!(cmd.meta().arity, -3);
        assert!(cmd.has_flag(CmdFlags::WRITE));
        assert!(cmd.has_flag(CmdFlags::DENYOOM));
        assert!(cmd.acl_category().contains(AclCategory::SET));
    }

    #[test]
    fn test_sadd_check_arg() {
        let cmd = SaddCmd::new();
        assert!(!cmd.check_arg(2));
        assert!(cmd.check_arg(3));
        assert!(cmd.check_arg(10));
    }
}
