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
use log::error;
use resp::RespData;
use store::{OpStatus, op_pop, util::parse_int};

use crate::{AclCategory, Cmd, CmdFlags, CmdMeta};
use crate::{impl_cmd_clone_box, impl_cmd_meta};

#[derive(Clone, Default)]
pub struct SpopCmd {
    meta: CmdMeta,
}

impl SpopCmd {
    pub fn new() -> Self {
        Self {
            meta: CmdMeta {
                name: "spop".to_string(),
                arity: -2, // SPOP key [count]
                flags: CmdFlags::WRITE | CmdFlags::RANDOM | CmdFlags::FAST,
                acl_category: AclCategory::SET | AclCategory::WRITE | AclCategory::FAST,
                ..Default::default()
            },
        }
    }
}

impl Cmd for SpopCmd {
    impl_cmd_meta!();
    impl_cmd_clone_box!();

    fn do_initial(&self, client: &Client) -> bool {
        let argv = client.argv();
        if argv.len() > 3 {
            client.set_reply(RespData::error(
                "ERR wrong number of arguments for 'spop' command",
            ));
            return false;
        }
        client.set_key(&argv[1]);
        true
    }

    fn do_cmd(&self, client: &Client, shard_set: Arc<ShardSet>) {
        let argv = client.argv();
        let key = argv[1].clone();
        let with_count = argv.len() > 2;

        let mut count = 1u32;
        if with_count {
            match parse_int(&argv[2]) {
                Some(n) if (0..=i64::from(u32::MAX)).contains(&n) => count = n as u32,
                _ => {
                    client.set_reply(RespData::error(resp::INVALID_INT_ERR));
                    return;
                }
            }
        }

        let mut tx = Transaction::new(&shard_set, client.db_index(), std::slice::from_ref(&key));
        let result = tx.schedule_single_hop_t(move |ctx, shard| {
            let mut op_args = shard.op_args(ctx.db_index());
            op_pop(&mut op_args, &key, count)
        });

        match result {
            Ok(mut members) => {
                if with_count {
                    client.set_reply(RespData::bulk_array(members));
                } else if let Some(member) = members.pop() {
                    client.set_reply(RespData::bulk(member));
                } else {
                    error!("single pop on a live key produced nothing");
                    client.set_reply(RespData::null());
                }
            }
            Err(OpStatus::KeyNotFound) => {
                if with_count {
                    client.set_reply(RespData::array(Vec::new()));
                } else {
                    client.set_reply(RespData::null());
                }
            }
            Err(status) => crate::reply_error(client, status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spop_cmd_meta() {
        let cmd = SpopCmd::new();
        assert_eq!(cmd.name(), "spop");
        assert_eq!(cmd.meta().arity, -2);
        assert!(cmd.has_flag(CmdFlags::RANDOM));
        assert!(cmd.has_flag(CmdFlags::WRITE));
    }
}
