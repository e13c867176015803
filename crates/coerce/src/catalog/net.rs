// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Network address converters.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::handler::FnHandler;
use crate::loader::ConverterLoader;
use crate::registry::Registry;

/// `String <-> IpAddr` and `String <-> SocketAddr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetConverters;

impl ConverterLoader for NetConverters {
    fn name(&self) -> &str {
        "net"
    }

    fn load(&self, registry: &Registry) {
        registry.register_handler(Arc::new(
            FnHandler::typed(|s: &String| Ok(s.trim().parse::<IpAddr>()?)).named("StringToIpAddr"),
        ));
        registry.register_handler(Arc::new(
            FnHandler::typed(|ip: &IpAddr| Ok(ip.to_string())).named("IpAddrToString"),
        ));
        registry.register_handler(Arc::new(
            FnHandler::typed(|s: &String| Ok(s.trim().parse::<SocketAddr>()?))
                .named("StringToSocketAddr"),
        ));
        registry.register_handler(Arc::new(
            FnHandler::typed(|addr: &SocketAddr| Ok(addr.to_string())).named("SocketAddrToString"),
        ));
    }
}
