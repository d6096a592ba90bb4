// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use graft_core::{
    DeserializeOptions, Graft, LifecycleHooks, SerializeOptions, Shared, StreamingContext,
    StreamingKind,
};
use graft_derive::GraftObject;
use std::sync::{Arc, Mutex};

type Log = Mutex<Vec<String>>;

fn record(context: &StreamingContext, event: &str) {
    if let Some(log) = context.context_as::<Log>() {
        log.lock().unwrap().push(event.to_string());
    }
}

#[derive(GraftObject)]
#[graft(hooks)]
struct Audited {
    revision: i32,
}

impl LifecycleHooks for Audited {
    fn on_serializing(&self, context: &StreamingContext) {
        record(context, "Audited.on_serializing");
    }

    fn on_deserialized(&mut self, context: &StreamingContext) {
        record(context, "Audited.on_deserialized");
    }

    fn on_deserialization_complete(&mut self, context: &StreamingContext) {
        record(context, "Audited.on_deserialization_complete");
    }
}

#[derive(GraftObject)]
#[graft(hooks)]
struct Document {
    #[graft(base)]
    audit: Audited,
    title: String,
    #[graft(skip)]
    title_upper: String,
}

impl LifecycleHooks for Document {
    fn on_serializing(&self, context: &StreamingContext) {
        assert_eq!(context.kind(), StreamingKind::Serialize);
        record(context, "Document.on_serializing");
    }

    fn on_serialized(&self, context: &StreamingContext) {
        record(context, "Document.on_serialized");
    }

    fn on_deserializing(&mut self, context: &StreamingContext) {
        assert_eq!(context.kind(), StreamingKind::Deserialize);
        record(context, "Document.on_deserializing");
    }

    fn on_deserialized(&mut self, context: &StreamingContext) {
        self.title_upper = self.title.to_uppercase();
        record(context, "Document.on_deserialized");
    }

    fn on_deserialization_complete(&mut self, context: &StreamingContext) {
        record(context, "Document.on_deserialization_complete");
    }
}

fn document(title: &str) -> Document {
    Document {
        audit: Audited { revision: 3 },
        title: title.to_string(),
        title_upper: String::new(),
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn test_serialize_hooks() {
    let graft = Graft::default();
    let log = Arc::new(Log::default());
    let options = SerializeOptions::default().context(log.clone());
    graft.serialize_with_options(&document("a"), &options).unwrap();
    assert_eq!(
        entries(&log),
        vec![
            "Audited.on_serializing",
            "Document.on_serializing",
            "Document.on_serialized",
        ]
    );
}

#[test]
fn test_deserialize_hooks_on_root() {
    let graft = Graft::default();
    let bytes = graft.serialize(&document("draft")).unwrap();
    let log = Arc::new(Log::default());
    let options = DeserializeOptions::default().context(log.clone());
    let back: Document = graft.deserialize_with_options(&bytes, &options).unwrap();
    assert_eq!(back.title_upper, "DRAFT");
    assert_eq!(back.audit.revision, 3);
    assert_eq!(
        entries(&log),
        vec![
            "Document.on_deserializing",
            "Audited.on_deserialized",
            "Document.on_deserialized",
            "Audited.on_deserialization_complete",
            "Document.on_deserialization_complete",
        ]
    );
}

#[test]
fn test_completion_after_whole_graph() {
    let graft = Graft::default();
    let docs = vec![Shared::new(document("one")), Shared::new(document("two"))];
    let bytes = graft.serialize(&docs).unwrap();
    let log = Arc::new(Log::default());
    let options = DeserializeOptions::default().context(log.clone());
    let back: Vec<Shared<Document>> = graft.deserialize_with_options(&bytes, &options).unwrap();
    assert_eq!(back[1].borrow().title_upper, "TWO");

    let events = entries(&log);
    let last_deserialized = events
        .iter()
        .rposition(|e| e.ends_with(".on_deserialized"))
        .unwrap();
    let first_complete = events
        .iter()
        .position(|e| e.ends_with(".on_deserialization_complete"))
        .unwrap();
    assert!(last_deserialized < first_complete);
    assert_eq!(
        events
            .iter()
            .filter(|e| *e == "Document.on_deserialization_complete")
            .count(),
        2
    );
}

#[test]
fn test_hooks_without_context() {
    let graft = Graft::default();
    let bytes = graft.serialize(&document("quiet")).unwrap();
    let back: Document = graft.deserialize(&bytes).unwrap();
    assert_eq!(back.title_upper, "QUIET");
}

#[test]
fn test_clone_runs_no_hooks() {
    let graft = Graft::default();
    let mut source = document("copy");
    source.title_upper = "COPY".to_string();
    let cloned = graft.deep_clone(&source).unwrap();
    assert_eq!(cloned.title, "copy");
    assert_eq!(cloned.audit.revision, 3);
    assert!(cloned.title_upper.is_empty());
}
