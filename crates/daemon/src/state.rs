//! Shared service state handed to every RPC handler.

use std::sync::Arc;

use crate::bucket::BucketProbe;
use crate::mounter::Mounter;
use crate::node::NodeMounts;

#[derive(Clone)]
pub struct ServiceState(Arc<StateInner>);

struct StateInner {
    vendor_version: String,
    node: Arc<NodeMounts>,
    mounter: Arc<dyn Mounter>,
    prober: Arc<dyn BucketProbe>,
}

impl ServiceState {
    pub fn new(
        vendor_version: impl Into<String>,
        node: Arc<NodeMounts>,
        mounter: Arc<dyn Mounter>,
        prober: Arc<dyn BucketProbe>,
    ) -> Self {
        Self(Arc::new(StateInner {
            vendor_version: vendor_version.into(),
            node,
            mounter,
            prober,
        }))
    }

    /// Release version reported in plugin info.
    pub fn vendor_version(&self) -> &str {
        &self.0.vendor_version
    }

    pub fn node(&self) -> &Arc<NodeMounts> {
        &self.0.node
    }

    pub fn mounter(&self) -> &Arc<dyn Mounter> {
        &self.0.mounter
    }

    pub fn prober(&self) -> &Arc<dyn BucketProbe> {
        &self.0.prober
    }
}
