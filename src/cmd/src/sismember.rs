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

use client::Client;
use engine::{ShardSet, Transaction};
use resp::RespData;
use store::{DataType, Object, OpStatus};

use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

#[derive(Clone, Default)]
pub struct SismemberCmd {
    meta: CmdMeta,
}

impl SismemberCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "sismember".to_string(),
                arity: 3, // SISMEMBER key member
                flags: CmdFlags::READONLY | CmdFlags::FAST,
                acl_category: AclCategory::SET | AclCategory::READ | AclCategory::FAST,
                ..Default::default()
            },
        }
    }
}

impl Cmd for SismemberCmd {
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
        let member = argv[2].clone();

        let mut tx = Transaction::new(&shard_set, client.db_index(), std::slice::from_ref(&key));
        let result = tx.schedule_single_hop_t(move |ctx, shard| {
            match shard.db_slice(ctx.db_index()).find(&key, DataType::Set)? {
                Object::Set(set) => Ok(set.is_member(&member)),
                _ => Err(OpStatus::Unexpected),
            }
        });

        match result {
            Ok(found) => client.set_reply(RespData::Integer(i64::from(found))),
            Err(OpStatus::KeyNotFound) => client.set_reply(RespData::Integer(0)),
            Err(status) => crate::reply_error(client, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sismember_cmd_meta() {
        let cmd = SismemberCmd::new();
        assert_eq!(cmd.name(), "sismember");
        assert_eq!(cmd.meta().arity, 3);
        assert!(cmd.has_flag(CmdFlags::READONLY));
    }
}
