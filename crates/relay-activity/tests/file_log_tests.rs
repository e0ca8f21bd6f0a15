use std::sync::Arc;

use relay_activity::{
    ActivityEntry, ActivityLog, ActivityRecorder, JsonFileActivityStore, ACTIVITY_FILE_NAME,
};
use tempfile::tempdir;
use tokio::time::{timeout, Duration};

#[tokio::test]
async fn recorded_entries_survive_a_restart() {
    let dir = tempdir().unwrap();

    {
        let log = ActivityLog::new(Arc::new(JsonFileActivityStore::in_dir(dir.path())), 200);
        let (recorder, worker) = ActivityRecorder::start(log, 8);
        recorder.record(ActivityEntry::new("/api/chat", "think", "Llama 3.3 70B", Some("why is the sky blue?")));
        recorder.record(ActivityEntry::new("/", "legacy", "Gemma 2 9B", None));
        drop(recorder);
        timeout(Duration::from_secs(2), worker).await.unwrap().unwrap();
    }

    let reopened = ActivityLog::new(Arc::new(JsonFileActivityStore::in_dir(dir.path())), 200);
    let stats = reopened.stats(None).await;

    assert_eq!(stats.total, 2);
    assert_eq!(stats.today, 2);
    assert_eq!(stats.logs[0].mode, "legacy");
    assert_eq!(stats.logs[0].query, "???");
    assert_eq!(stats.logs[1].query, "why is the sky blue?");
    assert!(dir.path().join(ACTIVITY_FILE_NAME).exists());
}

#[tokio::test]
async fn file_log_never_exceeds_its_maximum() {
    let dir = tempdir().unwrap();
    let log = ActivityLog::new(Arc::new(JsonFileActivityStore::in_dir(dir.path())), 5);

    for i in 0..12 {
        log.append(ActivityEntry::new("/api/chat", "quick", "Model", Some(&format!("q{i}"))))
            .await
            .unwrap();
    }

    let stats = log.stats(None).await;
    assert_eq!(stats.total, 5);
    assert_eq!(stats.logs.first().unwrap().query, "q11");
    assert_eq!(stats.logs.last().unwrap().query, "q7");
}

#[tokio::test]
async fn corrupt_file_reads_as_empty_and_is_replaced_on_append() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(ACTIVITY_FILE_NAME), "garbage").unwrap();
    let log = ActivityLog::new(Arc::new(JsonFileActivityStore::in_dir(dir.path())), 10);

    assert_eq!(log.stats(None).await.total, 0);

    log.append(ActivityEntry::new("/api/chat", "quick", "Model", Some("fresh")))
        .await
        .unwrap();

    let stats = log.stats(None).await;
    assert_eq!(stats.total, 1);
    assert_eq!(stats.logs[0].query, "fresh");
}
