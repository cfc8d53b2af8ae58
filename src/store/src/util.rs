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

use bytes::Bytes;

/// Parse the canonical decimal encoding of a signed 64-bit integer.
///
/// Only the exact form `format_int` produces round-trips: an optional `-`,
/// no leading zeros (`"0"` stands alone), no `+`, no surrounding bytes.
/// Members enter the intset representation only through this parser.
pub fn parse_int(buf: &[u8]) -> Option<i64> {
    if buf.is_empty() || buf.len() > 20 {
        return None;
    }
    let negative = buf[0] == b'-';
    let digits = if negative { &buf[1..] } else { buf };
    if digits.is_empty() {
        return None;
    }
    if digits[0] == b'0' && (negative || digits.len() > 1) {
        return None;
    }

    let mut value: u64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(b - b'0'))?;
    }

    if negative {
        if value > i64::MAX as u64 + 1 {
            return None;
        }
        // i64::MIN survives the cast-then-negate
        Some((value as i64).wrapping_neg())
    } else {
        if value > i64::MAX as u64 {
            return None;
        }
        Some(value as i64)
    }
}

/// Canonical decimal form of an integer member.
pub fn format_int(value: i64) -> Bytes {
    Bytes::from(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        assert_eq!(parse_int(b"0"), Some(0));
        assert_eq!(parse_int(b"42"), Some(42));
        assert_eq!(parse_int(b"-7"), Some(-7));
        assert_eq!(parse_int(b"9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int(b"-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn test_parse_rejects_non_canonical() {
        assert_eq!(parse_int(b""), None);
        assert_eq!(parse_int(b"+1"), None);
        assert_eq!(parse_int(b"007"), None);
        assert_eq!(parse_int(b"-0"), None);
        assert_eq!(parse_int(b"1 "), None);
        assert_eq!(parse_int(b"1a"), None);
        assert_eq!(parse_int(b"-"), None);
        assert_eq!(parse_int(b"9223372036854775808"), None);
        assert_eq!(parse_int(b"-9223372036854775809"), None);
    }

    #[test]
    fn test_round_trip() {
        for v in [0, 1, -1, 512, i64::MAX, i64::MIN] {
            assert_eq!(parse_int(&format_int(v)), Some(v));
        }
    }
}
