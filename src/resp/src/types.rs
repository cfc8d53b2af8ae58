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

use std::fmt;

use bytes::Bytes;

/// RESP2 reply value.
///
/// `BulkString(None)` is the null bulk string, `Array(None)` the null array.
#[derive(Clone, PartialEq, Eq)]
pub enum RespData {
    SimpleString(Bytes),
    Error(Bytes),
    Integer(i64),
    BulkString(Option<Bytes>),
    Array(Option<Vec<RespData>>),
}

impl Default for RespData {
    fn default() -> Self {
        RespData::BulkString(None)
    }
}

impl RespData {
    pub fn simple(msg: &str) -> Self {
        RespData::SimpleString(Bytes::copy_from_slice(msg.as_bytes()))
    }

    pub fn error(msg: &str) -> Self {
        RespData::Error(Bytes::copy_from_slice(msg.as_bytes()))
    }

    pub fn bulk(value: impl Into<Bytes>) -> Self {
        RespData::BulkString(Some(value.into()))
    }

    pub fn null() -> Self {
        RespData::BulkString(None)
    }

    pub fn array(items: Vec<RespData>) -> Self {
        RespData::Array(Some(items))
    }

    /// Array of bulk strings, the shape of every multi-member set reply.
    pub fn bulk_array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
    {
        RespData::Array(Some(
            items
                .into_iter()
                .map(|b| RespData::BulkString(Some(b)))
                .collect(),
        ))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RespData::Error(_))
    }
}

impl fmt::Debug for RespData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespData::SimpleString(s) => write!(f, "Simple({})", String::from_utf8_lossy(s)),
            RespData::Error(e) => write!(f, "Error({})", String::from_utf8_lossy(e)),
            RespData::Integer(n) => write!(f, "Integer({n})"),
            RespData::BulkString(None) => write!(f, "Null"),
            RespData::BulkString(Some(b)) => write!(f, "Bulk({})", String::from_utf8_lossy(b)),
            RespData::Array(None) => write!(f, "NullArray"),
            RespData::Array(Some(items)) => f.debug_list().entries(items.iter()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null_bulk() {
        assert_eq!(RespData::default(), RespData::BulkString(None));
    }

    #[test]
    fn test_bulk_array() {
        let arr = RespData::bulk_array(vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
        match arr {
            RespData::Array(Some(items)) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0], RespData::bulk("a"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }
}
