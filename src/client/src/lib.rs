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

//! Per-connection command context.
//!
//! The network stream itself is owned by the serving layer; this crate only
//! carries the state a command handler reads and writes: parsed argv, the
//! current key, the pending reply, and connection-scoped mode bits.

use bytes::Bytes;
use resp::RespData;

#[derive(Default)]
pub struct Client {
    ctx: parking_lot::Mutex<ClientContext>,
}

#[derive(Default)]
struct ClientContext {
    argv: Vec<Bytes>,
    cmd_name: Bytes,
    key: Bytes,
    reply: RespData,
    db_index: usize,
    // Set while the connection executes a scripted transaction. Commands
    // whose reply order depends on encoding or hash seed must sort.
    script_mode: bool,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_argv(&self, argv: &[Bytes]) {
        let mut ctx = self.ctx.lock();
        ctx.argv = argv.to_vec();
    }

    pub fn argv(&self) -> Vec<Bytes> {
        let ctx = self.ctx.lock();
        ctx.argv.clone()
    }

    pub fn set_cmd_name(&self, name: &[u8]) {
        let mut ctx = self.ctx.lock();
        ctx.cmd_name = Bytes::copy_from_slice(name);
    }

    pub fn cmd_name(&self) -> Bytes {
        let ctx = self.ctx.lock();
        ctx.cmd_name.clone()
    }

    pub fn set_key(&self, key: &[u8]) {
        let mut ctx = self.ctx.lock();
        ctx.key = Bytes::copy_from_slice(key);
    }

    pub fn key(&self) -> Bytes {
        let ctx = self.ctx.lock();
        ctx.key.clone()
    }

    pub fn set_reply(&self, reply: RespData) {
        let mut ctx = self.ctx.lock();
        ctx.reply = reply;
    }

    pub fn take_reply(&self) -> RespData {
        let mut ctx = self.ctx.lock();
        std::mem::take(&mut ctx.reply)
    }

    pub fn set_db_index(&self, db_index: usize) {
        let mut ctx = self.ctx.lock();
        ctx.db_index = db_index;
    }

    pub fn db_index(&self) -> usize {
        let ctx = self.ctx.lock();
        ctx.db_index
    }

    pub fn set_script_mode(&self, on: bool) {
        let mut ctx = self.ctx.lock();
        ctx.script_mode = on;
    }

    pub fn script_mode(&self) -> bool {
        let ctx = self.ctx.lock();
        ctx.script_mode
    }
}
