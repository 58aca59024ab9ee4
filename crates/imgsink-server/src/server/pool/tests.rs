use super::{PoolState, WorkerPool};
use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{Instant, sleep, timeout};

const GRACE: Duration = Duration::from_millis(50);

#[tokio::test]
async fn executes_a_submitted_task() {
    let pool = WorkerPool::new(2);
    let (tx, rx) = tokio::sync::oneshot::channel();

    assert!(
        pool.submit(async move {
            let _ = tx.send(());
        })
        .await
    );

    timeout(Duration::from_secs(1), rx)
        .await
        .expect("task should run promptly")
        .expect("task should signal completion");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sheds_load_when_saturated() {
    let pool = WorkerPool::with_grace_period(2, GRACE);
    let gate = Arc::new(Semaphore::new(0));

    for _ in 0..2 {
        let gate = Arc::clone(&gate);
        assert!(
            pool.submit(async move {
                let _ = gate.acquire().await;
            })
            .await
        );
    }

    // Wait until both workers have actually picked their task up.
    while pool.in_flight() < 2 {
        sleep(Duration::from_millis(1)).await;
    }

    let started = Instant::now();
    assert!(!pool.submit(async {}).await);
    let elapsed = started.elapsed();
    assert!(elapsed >= GRACE, "rejection came before the grace period");
    assert!(
        elapsed < GRACE + Duration::from_millis(500),
        "submit must return within grace plus a small epsilon, took {elapsed:?}"
    );

    gate.add_permits(2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn never_exceeds_pool_size() {
    let pool = WorkerPool::with_grace_period(3, Duration::from_millis(200));
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut accepted = 0;
    for _ in 0..50 {
        let current = Arc::clone(&current);
        let peak = Arc::clone(&peak);
        let ok = pool
            .submit(async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                sleep(Duration::from_millis(5)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            })
            .await;
        if ok {
            accepted += 1;
        }
    }

    while pool.in_flight() > 0 {
        sleep(Duration::from_millis(5)).await;
    }

    assert!(accepted > 0);
    assert!(peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn rejects_after_shutdown_and_never_runs_the_task() {
    let pool = WorkerPool::new(1);
    pool.shutdown();

    let ran = Arc::new(AtomicUsize::new(0));
    let flag = Arc::clone(&ran);
    assert!(
        !pool
            .submit(async move {
                flag.fetch_add(1, Ordering::SeqCst);
            })
            .await
    );

    sleep(Duration::from_millis(50)).await;
    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_ne!(pool.state(), PoolState::Running);
}

#[tokio::test]
async fn shutdown_twice_is_harmless() {
    let pool = WorkerPool::new(2);
    assert_eq!(pool.state(), PoolState::Running);

    pool.shutdown();
    pool.shutdown();

    assert!(pool.drain(Duration::from_secs(1)).await);
    assert_eq!(pool.state(), PoolState::Stopped);
    assert_eq!(pool.in_flight(), 0);
}

#[tokio::test]
async fn accepted_task_still_runs_exactly_once_across_shutdown() {
    let pool = WorkerPool::new(1);
    let ran = Arc::new(AtomicUsize::new(0));

    let flag = Arc::clone(&ran);
    assert!(
        pool.submit(async move {
            flag.fetch_add(1, Ordering::SeqCst);
        })
        .await
    );
    pool.shutdown();

    assert!(pool.drain(Duration::from_secs(1)).await);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_submitters_race_shutdown_without_faulting() {
    let pool = Arc::new(WorkerPool::with_grace_period(2, Duration::from_millis(20)));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let pool = Arc::clone(&pool);
        handles.push(tokio::spawn(async move {
            for _ in 0..16 {
                let _ = pool
                    .submit(async {
                        sleep(Duration::from_millis(1)).await;
                    })
                    .await;
            }
        }));
    }

    sleep(Duration::from_millis(10)).await;
    pool.shutdown();

    for handle in handles {
        handle.await.expect("submitter task panicked");
    }
    assert!(pool.drain(Duration::from_secs(1)).await);
    assert_eq!(pool.in_flight(), 0);
}
