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

pub mod combine;
pub mod get;
pub mod sadd;
pub mod scard;
pub mod sdiff;
pub mod sdiffstore;
pub mod set;
pub mod sinter;
pub mod sinterstore;
pub mod sismember;
pub mod smembers;
pub mod smove;
pub mod spop;
pub mod srem;
pub mod sunion;
pub mod sunionstore;
pub mod table;

use std::sync::Arc;

use bitflags::bitflags;
use bytes::Bytes;
use client::Client;
use engine::ShardSet;
use log::{debug, error};
use resp::RespData;
use store::OpStatus;

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CmdFlags: u32 {
        const WRITE    = 1 << 0;  // May modify the dataset
        const READONLY = 1 << 1;  // Doesn't modify the dataset
        const ADMIN    = 1 << 2;  // Administrative command
        const NOSCRIPT = 1 << 3;  // Not allowed in Lua scripts
        const FAST     = 1 << 4;  // O(1) or small bounded cost
        const DENYOOM  = 1 << 5;  // Rejected above the memory watermark
        const RANDOM   = 1 << 6;  // Reply may differ across identical calls
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct AclCategory: u32 {
        const KEYSPACE  = 1 << 0;
        const READ      = 1 << 1;
        const WRITE     = 1 << 2;
        const SET       = 1 << 3;
        const STRING    = 1 << 4;
        const FAST      = 1 << 5;
        const SLOW      = 1 << 6;
        const DANGEROUS = 1 << 7;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CmdMeta {
    pub name: String,
    pub arity: i16,
    pub flags: CmdFlags,
    pub acl_category: AclCategory,
    pub cmd_id: u32,
}

pub trait Cmd: Send + Sync {
    /// return cmd meta
    fn meta(&self) -> &CmdMeta;

    fn do_initial(&self, client: &Client) -> bool;

    fn do_cmd(&self, client: &Client, shard_set: Arc<ShardSet>);

    fn clone_box(&self) -> Box<dyn Cmd>;

    fn execute(&self, client: &Client, shard_set: Arc<ShardSet>) {
        debug!("execute command: {:?}", client.cmd_name());
        if self.do_initial(client) {
            self.do_cmd(client, shard_set);
        }
    }

    fn name(&self) -> &str {
        &self.meta().name
    }

    /// Positive arity is exact, negative means at-least.
    fn check_arg(&self, num: usize) -> bool {
        let arity = self.meta().arity;
        if arity > 0 {
            num == arity as usize
        } else {
            num >= -arity as usize
        }
    }

    fn has_flag(&self, flag: CmdFlags) -> bool {
        self.meta().flags.contains(flag)
    }

    fn acl_category(&self) -> AclCategory {
        self.meta().acl_category
    }
}

#[macro_export]
macro_rules! impl_cmd_meta {
    () => {
        fn meta(&self) -> &CmdMeta {
            &self.meta
        }
    };
}

#[macro_export]
macro_rules! impl_cmd_clone_box {
    () => {
        fn clone_box(&self) -> Box<dyn Cmd> {
            Box::new(self.clone())
        }
    };
}

/// Shape an error status into the client reply. `KeyNotFound` is handled
/// per command before this is reached; anything unexpected is logged and
/// answered with a null.
pub(crate) fn reply_error(client: &Client, status: OpStatus) {
    match status {
        OpStatus::WrongType => client.set_reply(RespData::error(resp::WRONG_TYPE_ERR)),
        OpStatus::InvalidInt => client.set_reply(RespData::error(resp::INVALID_INT_ERR)),
        status => {
            error!("unexpected status: {status}");
            client.set_reply(RespData::null());
        }
    }
}

/// Array reply for member lists. Scripted transactions need deterministic
/// output, so the members are sorted there.
pub(crate) fn reply_member_array(client: &Client, mut members: Vec<Bytes>) {
    if client.script_mode() {
        members.sort();
    }
    client.set_reply(RespData::bulk_array(members));
}
