use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::{
    events::{GraphEvent, NodeEvent, WorkflowEvent},
    runtime::Channel,
    store::{Store, data},
    utils,
};

/// Background observer that materializes execution events into store
/// records: raw event rows, proc state transitions, and per-node states.
pub struct Monitor {
    store: Arc<Store>,
    channel: Arc<Channel>,

    runtime: Arc<Runtime>,
}

impl Monitor {
    pub fn new(
        store: Arc<Store>,
        channel: Arc<Channel>,
        runtime: Arc<Runtime>,
    ) -> Self {
        Self {
            store,
            channel,
            runtime,
        }
    }

    pub fn monitor(&self) {
        let store = self.store.clone();
        let channel = self.channel.clone();

        self.runtime.spawn(async move {
            let mut event_queue = channel.event_queue().subscribe();
            while let Ok(event_msg) = event_queue.recv().await {
                let event = &event_msg;
                // 1. Persist raw event
                let _ = store.events().create(&data::Event {
                    id: utils::longid(),
                    xid: event.xid.clone(),
                    wid: event.wid.clone(),
                    nid: event.nid.clone(),
                    name: match &event.event {
                        GraphEvent::Workflow(_) => "Workflow".to_string(),
                        GraphEvent::Node(n) => n.str().to_string(),
                    },
                    message: format!("{:?}", event.event),
                    timestamp: utils::time::time_millis(),
                });

                // 2. Update entity state (Proc / Node)
                match &event.event {
                    GraphEvent::Workflow(e) => {
                        // Batch-create node records in Pending state on start
                        if let WorkflowEvent::Start(start_event) = e {
                            let now = utils::time::time_millis();
                            for nid in &start_event.node_ids {
                                let node_data = data::Node {
                                    id: format!("{}-{}", event.xid, nid),
                                    xid: event.xid.clone(),
                                    wid: event.wid.clone(),
                                    nid: nid.clone(),
                                    state: "Pending".to_string(),
                                    err: None,
                                    start_time: 0,
                                    end_time: 0,
                                    timestamp: now,
                                };
                                let _ = store.nodes().create(&node_data);
                            }
                        }

                        // Update proc state
                        if let Ok(mut proc_data) = store.procs().find(&event.xid) {
                            proc_data.state = e.str().to_string();
                            proc_data.timestamp = utils::time::time_millis();

                            match e {
                                WorkflowEvent::Succeeded | WorkflowEvent::Failed(_) | WorkflowEvent::Aborted(_) => {
                                    proc_data.end_time = utils::time::time_millis();
                                }
                                _ => {}
                            }

                            if let WorkflowEvent::Failed(f) = e {
                                proc_data.err = Some(f.error.clone());
                            }
                            if let WorkflowEvent::Aborted(a) = e {
                                proc_data.err = Some(a.reason.clone());
                            }

                            let _ = store.procs().update(&proc_data);
                        }
                    }
                    GraphEvent::Node(n) => {
                        let node_id = format!("{}-{}", event.xid, event.nid);
                        let now = utils::time::time_millis();

                        // Get or create the node record (a Running event can
                        // arrive before the Start event has been processed)
                        let mut node_data = match store.nodes().find(&node_id) {
                            Ok(data) => data,
                            Err(_) => {
                                let new_node = data::Node {
                                    id: node_id.clone(),
                                    xid: event.xid.clone(),
                                    wid: event.wid.clone(),
                                    nid: event.nid.clone(),
                                    state: "Pending".to_string(),
                                    err: None,
                                    start_time: 0,
                                    end_time: 0,
                                    timestamp: now,
                                };
                                let _ = store.nodes().create(&new_node);
                                new_node
                            }
                        };

                        node_data.state = n.str().to_string();
                        node_data.timestamp = now;

                        match n {
                            NodeEvent::Running(timestamp) => {
                                node_data.start_time = *timestamp;
                            }
                            NodeEvent::Succeeded(timestamp) => {
                                node_data.end_time = *timestamp;
                            }
                            NodeEvent::Failed(reason) => {
                                node_data.end_time = now;
                                node_data.err = Some(reason.to_string());
                            }
                        }

                        let _ = store.nodes().update(&node_data);
                    }
                }
            }
        });

        let store = self.store.clone();
        let channel = self.channel.clone();

        self.runtime.spawn(async move {
            let mut log_queue = channel.log_queue().subscribe();
            while let Ok(log_msg) = log_queue.recv().await {
                let log = &log_msg;
                let _ = store.logs().create(&data::Log {
                    id: utils::longid(),
                    xid: log.xid.clone(),
                    nid: log.nid.clone(),
                    content: log.content.clone(),
                    timestamp: log.timestamp,
                });
            }
        });
    }
}
