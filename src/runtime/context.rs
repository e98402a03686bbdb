use std::sync::Arc;

use crate::{
    common::{MemCache, Shutdown, Vars},
    events::{Event, Log},
    runtime::Channel,
    utils,
};

/// Per-execution context: collected stage outputs, the event channel, and
/// the execution's shutdown signal.
#[derive(Clone)]
pub struct Context {
    xid: String,
    wid: String,
    outputs: Arc<MemCache<String, Vars>>,
    channel: Arc<Channel>,

    shutdown: Arc<Shutdown>,
}

impl Context {
    pub fn new(
        xid: String,
        wid: String,
        channel: Arc<Channel>,
    ) -> Self {
        Self {
            xid,
            wid,
            outputs: Arc::new(MemCache::new(1024)),
            channel,
            shutdown: Arc::new(Shutdown::new()),
        }
    }

    pub fn outputs(&self) -> Arc<MemCache<String, Vars>> {
        self.outputs.clone()
    }

    pub fn add_output(
        &self,
        nid: String,
        outputs: Vars,
    ) {
        self.outputs.set(nid, outputs);
    }

    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    pub fn emit_log(
        &self,
        nid: String,
        content: String,
    ) {
        let log = Log {
            xid: self.xid.clone(),
            nid,
            content,
            timestamp: utils::time::time_millis(),
        };
        let _ = self.channel.log_queue().send(Event::new(&log));
    }

    pub fn xid(&self) -> String {
        self.xid.to_owned()
    }

    pub fn wid(&self) -> String {
        self.wid.to_owned()
    }

    pub fn done(&self) {
        self.shutdown.shutdown();
    }

    pub fn is_terminated(&self) -> bool {
        self.shutdown.is_terminated()
    }

    pub fn wait_shutdown(&self) -> impl Future<Output = ()> + Send + 'static {
        self.shutdown.wait()
    }
}
