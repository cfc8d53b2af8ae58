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

use std::collections::HashMap;
use std::sync::Arc;

use client::Client;
use engine::ShardSet;
use resp::RespData;

use crate::Cmd;

pub type CmdTable = HashMap<String, Arc<dyn Cmd>>;

#[macro_export]
macro_rules! register_cmd {
    ($cmd_table:expr, $($cmd_struct:ty),+ $(,)?) => {
        $(
            {
                let cmd = <$cmd_struct>::new();
                let cmd_name = cmd.meta().name.clone();
                let arc_cmd = Arc::new(cmd);
                $cmd_table.insert(cmd_name, arc_cmd);
            }
        )+
    };
}

pub fn create_command_table() -> CmdTable {
    let mut cmd_table: CmdTable = HashMap::new();

    register_cmd!(
        cmd_table,
        crate::get::GetCmd,
        crate::set::SetCmd,
        crate::sadd::SaddCmd,
        crate::scard::ScardCmd,
        crate::sdiff::SdiffCmd,
        crate::sdiffstore::SdiffstoreCmd,
        crate::sinter::SinterCmd,
        crate::sinterstore::SinterstoreCmd,
        crate::sismember::SismemberCmd,
        crate::smembers::SmembersCmd,
        crate::smove::SmoveCmd,
        crate::spop::SpopCmd,
        crate::srem::SremCmd,
        crate::sunion::SunionCmd,
        crate::sunionstore::SunionstoreCmd,
    );

    cmd_table
}

/// Look up, arity-check and run one parsed command against the shard set.
pub fn dispatch(cmd_table: &CmdTable, client: &Client, shard_set: &Arc<ShardSet>) {
    let argv = client.argv();
    if argv.is_empty() {
        client.set_reply(RespData::error("ERR empty command"));
        return;
    }

    let name = String::from_utf8_lossy(&argv[0]).to_lowercase();
    let Some(cmd) = cmd_table.get(&name) else {
        client.set_reply(RespData::error(&format!("ERR unknown command '{name}'")));
        return;
    };
    if !cmd.check_arg(argv.len()) {
        client.set_reply(RespData::error(&format!(
            "ERR wrong number of arguments for '{name}' command"
        )));
        return;
    }

    client.set_cmd_name(name.as_bytes());
    cmd.execute(client, shard_set.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_holds_set_family() {
        let table = create_command_table();
        for name in [
            "sadd",
            "srem",
            "sismember",
            "scard",
            "smembers",
            "spop",
            "smove",
            "sunion",
            "sunionstore",
            "sinter",
            "sinterstore",
            "sdiff",
            "sdiffstore",
        ] {
            assert!(table.contains_key(name), "missing command {name}");
        }
    }
}
