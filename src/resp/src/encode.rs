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

use bytes::{BufMut, Bytes, BytesMut};

use crate::CRLF;
use crate::types::RespData;

/// Accumulating RESP2 wire encoder.
#[derive(Default)]
pub struct RespEncoder {
    buf: BytesMut,
}

impl RespEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, data: &RespData) -> &mut Self {
        match data {
            RespData::SimpleString(s) => {
                self.buf.put_u8(b'+');
                self.buf.put_slice(s);
                self.buf.put_slice(CRLF.as_bytes());
            }
            RespData::Error(e) => {
                self.buf.put_u8(b'-');
                self.buf.put_slice(e);
                self.buf.put_slice(CRLF.as_bytes());
            }
            RespData::Integer(n) => {
                self.buf.put_slice(format!(":{n}{CRLF}").as_bytes());
            }
            RespData::BulkString(None) => {
                self.buf.put_slice(format!("$-1{CRLF}").as_bytes());
            }
            RespData::BulkString(Some(b)) => {
                self.buf.put_slice(format!("${}{CRLF}", b.len()).as_bytes());
                self.buf.put_slice(b);
                self.buf.put_slice(CRLF.as_bytes());
            }
            RespData::Array(None) => {
                self.buf.put_slice(format!("*-1{CRLF}").as_bytes());
            }
            RespData::Array(Some(items)) => {
                self.buf
                    .put_slice(format!("*{}{CRLF}", items.len()).as_bytes());
                for item in items {
                    self.encode(item);
                }
            }
        }
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.buf.clear();
        self
    }

    pub fn take(&mut self) -> Bytes {
        self.buf.split().freeze()
    }
}

/// Encode a single reply to its wire form.
pub fn encode(data: &RespData) -> Bytes {
    let mut encoder = RespEncoder::new();
    encoder.encode(data);
    encoder.take()
}
