use std::sync::Arc;

use parking_lot::Mutex;

use logpeek::{
    format_args, Call, Console, ConsoleProxy, EntryFn, Level, LogRecord, PatchState, RecordBuffer,
    SafeValue, StackPolicy, Subscribe, SubscriberFn, Value, CIRCULAR_REFERENCE,
};

type Lines = Arc<Mutex<Vec<String>>>;

/// Console whose sinks append `level:text` lines instead of printing.
fn recording_console() -> (Arc<Console>, Lines) {
    let out: Lines = Arc::new(Mutex::new(Vec::new()));
    let sink = |prefix: &'static str| -> EntryFn {
        let out = Arc::clone(&out);
        Arc::new(move |call: &Call<'_>| {
            out.lock().push(format!("{prefix}:{}", format_args(call.args)))
        })
    };
    let console = Console::with_sinks(sink("log"), sink("warn"), sink("error"));
    (Arc::new(console), out)
}

fn collector(name: &'static str) -> (Arc<dyn Subscribe>, Arc<Mutex<Vec<LogRecord>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let sub = SubscriberFn::arc(name, move |r: &LogRecord| s.lock().push(r.clone()));
    (sub, seen)
}

#[tokio::test]
async fn each_level_is_delivered_once_and_printed_once() {
    let (console, out) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (sub, seen) = collector("collect");
    let disposer = proxy.init(sub);

    console.log(&[Value::from("one")]);
    console.warn(&[Value::from("two")]);
    console.error(&[Value::from("three")]);
    proxy.flush().await;

    assert_eq!(*out.lock(), vec!["log:one", "warn:two", "error:three"]);
    let levels: Vec<Level> = seen.lock().iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![Level::Log, Level::Warn, Level::Error]);

    disposer.dispose();
}

#[tokio::test]
async fn warn_example_end_to_end() {
    let (console, out) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (sub, seen) = collector("collect");
    let _disposer = proxy.init(sub);

    console.warn(&[Value::from("Deprecated"), Value::object([("a", 1)])]);
    proxy.flush().await;

    assert_eq!(*out.lock(), vec!["warn:Deprecated { a: 1 }"]);
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    let rec = &seen[0];
    assert_eq!(rec.level, Level::Warn);
    assert!(rec.stack.is_none());
    assert_eq!(
        rec.args,
        vec![
            SafeValue::string("Deprecated"),
            SafeValue::Map(vec![("a".into(), SafeValue::Number(1.0))]),
        ]
    );
    assert_eq!(
        serde_json::to_value(&rec.args).unwrap(),
        serde_json::json!(["Deprecated", { "a": 1.0 }])
    );
}

#[tokio::test]
async fn self_referencing_argument_yields_sentinel() {
    let (console, _) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (sub, seen) = collector("collect");
    let _disposer = proxy.init(sub);

    let obj = logpeek::Object::new();
    obj.set("name", "loop");
    obj.set("self", Value::Object(obj.clone()));
    console.log(&[Value::Object(obj.clone())]);
    proxy.flush().await;

    let seen = seen.lock();
    let arg = &seen[0].args[0];
    assert_eq!(arg.get("name").and_then(SafeValue::as_str), Some("loop"));
    assert_eq!(arg.get("self").and_then(SafeValue::as_str), Some(CIRCULAR_REFERENCE));

    // break the cycle so the handles are freed
    obj.remove("self");
}

#[tokio::test]
async fn record_ids_are_unique() {
    let (console, _) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (sub, seen) = collector("collect");
    let _disposer = proxy.init(sub);

    console.log(&[Value::from("First")]);
    console.log(&[Value::from("Second")]);
    proxy.flush().await;

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0].id, seen[1].id);
}

#[tokio::test]
async fn dispose_stops_delivery_and_restores_console() {
    let (console, out) = recording_console();
    let originals: Vec<EntryFn> = Level::ALL.iter().map(|l| console.entry(*l).load()).collect();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (sub, seen) = collector("collect");

    let disposer = proxy.init(sub);
    disposer.dispose();
    assert_eq!(proxy.state(), PatchState::Uninitialized);

    console.log(&[Value::from("after")]);
    proxy.flush().await;

    assert!(seen.lock().is_empty());
    assert_eq!(*out.lock(), vec!["log:after"]);
    for (level, original) in Level::ALL.iter().zip(&originals) {
        assert!(console.entry(*level).is(original));
    }
}

#[tokio::test]
async fn failing_subscriber_does_not_starve_others() {
    let (console, out) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let bad: Arc<dyn Subscribe> = SubscriberFn::arc("bad", |_: &LogRecord| panic!("boom"));
    let (good, seen) = collector("good");
    let _d1 = proxy.init(bad);
    let _d2 = proxy.init(good);

    console.log(&[Value::from("a")]);
    console.log(&[Value::from("b")]);
    proxy.flush().await;

    assert_eq!(seen.lock().len(), 2);
    let out = out.lock();
    let reports: Vec<_> = out.iter().filter(|l| l.starts_with("error:")).collect();
    assert_eq!(reports.len(), 2);
    assert!(reports[0].contains("bad panicked: boom"), "{}", reports[0]);
}

#[tokio::test]
async fn only_error_records_carry_stacks() {
    let (console, _) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (sub, seen) = collector("collect");
    let _disposer = proxy.init(sub);

    console.log(&[Value::from("info")]);
    console.warn(&[Value::from("warn")]);
    console.error(&[Value::from("error")]);
    proxy.emit(Level::Log, &[Value::from("direct")]);
    proxy.emit_with(Level::Warn, &[Value::from("forced")], StackPolicy::Always);
    proxy.emit_with(Level::Error, &[Value::from("bare")], StackPolicy::Never);
    proxy.flush().await;

    let seen = seen.lock();
    let stacks: Vec<bool> = seen.iter().map(|r| r.stack.is_some()).collect();
    assert_eq!(stacks, vec![false, false, true, false, true, false]);

    let stack = seen[2].stack.as_deref().unwrap();
    assert!(stack.starts_with("Error\n    at "), "{stack}");
    assert!(stack.contains("capture.rs"), "{stack}");
}

#[tokio::test]
async fn duplicate_registration_delivers_once() {
    let (console, _) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (sub, seen) = collector("collect");

    let first = proxy.init(Arc::clone(&sub));
    let second = proxy.init(sub);
    console.log(&[Value::from("x")]);
    proxy.flush().await;

    assert_eq!(seen.lock().len(), 1);
    assert_eq!(proxy.subscriber_count(), 1);

    first.dispose();
    first.dispose();
    second.dispose();
    assert_eq!(proxy.state(), PatchState::Uninitialized);
}

#[tokio::test]
async fn each_disposer_reverses_only_its_registration() {
    let (console, _) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let (a, seen_a) = collector("a");
    let (b, seen_b) = collector("b");
    let da = proxy.init(a);
    let _db = proxy.init(b);

    da.dispose();
    console.warn(&[Value::from("still captured")]);
    proxy.flush().await;

    assert!(seen_a.lock().is_empty());
    assert_eq!(seen_b.lock().len(), 1);
    assert_eq!(proxy.state(), PatchState::Patched);
}

#[tokio::test]
async fn delivery_runs_off_the_calling_thread() {
    let (console, _) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let threads = Arc::new(Mutex::new(Vec::new()));
    let t = Arc::clone(&threads);
    let sub = SubscriberFn::arc("thread", move |_: &LogRecord| {
        t.lock()
            .push(std::thread::current().name().map(str::to_owned));
    });
    let _disposer = proxy.init(sub);

    console.log(&[Value::from("x")]);
    proxy.flush().await;

    assert_eq!(*threads.lock(), vec![Some("logpeek-dispatch".to_owned())]);
}

#[tokio::test]
async fn record_buffer_collects_history() {
    let (console, _) = recording_console();
    let proxy = ConsoleProxy::new(Arc::clone(&console));
    let buffer = Arc::new(RecordBuffer::new(2));
    let _disposer = proxy.init(buffer.clone());

    console.log(&[Value::from("a")]);
    console.warn(&[Value::from("b")]);
    console.error(&[Value::from("c")]);
    proxy.flush().await;

    let kept: Vec<String> = buffer.records().iter().map(|r| r.message()).collect();
    assert_eq!(kept, vec!["b", "c"]);
    assert_eq!(buffer.counts().total(), 2);
}
