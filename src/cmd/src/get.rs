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
use store::OpStatus;

use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

#[derive(Clone, Default)]
pub struct GetCmd {
    meta: CmdMeta,
}

impl GetCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "get".to_string(),
                arity: 2, // GET key
                flags: CmdFlags::READONLY | CmdFlags::FAST,
                acl_category: AclCategory::STRING | AclCategory::READ | AclCategory::FAST,
                ..Default::default()
            },
        }
    }
}

impl Cmd for GetCmd {
    impl_cmd_meta!();
    impl_cmd_clone_box!();

    fn do_initial(&self, client: &Client) -> bool {
        let argv = client.argv();
        client.set_key(&argv[1]);
        true
    }

    fn do_cmd(&self, client: &Client, shard_set: Arc<ShardSet>) {
        let key = client.key();

        let mut tx = Transaction::new(&shard_set, client.db_index(), std::slice::from_ref(&key));
        let result = tx
            .schedule_single_hop_t(move |ctx, shard| shard.db_slice(ctx.db_index()).get_str(&key));

        match result {
            Ok(value) => client.set_reply(RespData::bulk(value)),
            Err(OpStatus::KeyNotFound) => client.set_reply(RespData::null()),
            Err(status) => crate::reply_error(client, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cmd_meta() {
        let cmd = GetCmd::new();
        assert_eq!(cmd.name(), "get");
        assert_eq!(cmd.meta().arity, 2);
        assert!(cmd.has_flag(CmdFlags::READONLY));
    }
}
