//! Node address translation hook.

use async_trait::async_trait;
use peerlens_core::proxy::AddressRewriteRule;
use scylla::transport::errors::TranslationError;
use scylla::transport::session::AddressTranslator;
use scylla::transport::topology::UntranslatedPeer;
use std::net::SocketAddr;

/// Registers an [`AddressRewriteRule`] as the driver's address translator.
///
/// The driver asks for a translation before every connection to a node it
/// discovered; this never fails and never touches the network.
#[derive(Debug, Clone)]
pub struct ProxyTranslator {
    rule: AddressRewriteRule,
}

impl ProxyTranslator {
    pub fn new(rule: AddressRewriteRule) -> Self {
        Self { rule }
    }

    pub fn translate(&self, addr: SocketAddr) -> SocketAddr {
        self.rule.translate_socket(addr)
    }
}

#[async_trait]
impl AddressTranslator for ProxyTranslator {
    async fn translate_address(
        &self,
        untranslated_peer: &UntranslatedPeer,
    ) -> Result<SocketAddr, TranslationError> {
        Ok(self.translate(untranslated_peer.untranslated_address))
    }
}
