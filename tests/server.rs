#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! End-to-end tests over real TCP: multi-port listening, connection
//! isolation, and cooperative shutdown.

use framesink::config::ServerConfig;
use framesink::service::ListenerSet;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinSet;

fn ephemeral_config(listeners: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        ports: vec![0; listeners],
    }
}

fn tx(tx_type: u8, tx_id: u64) -> Vec<u8> {
    let mut payload = vec![tx_type];
    payload.extend_from_slice(&tx_id.to_be_bytes());
    let mut bytes = (payload.len() as u32).to_be_bytes().to_vec();
    bytes.extend_from_slice(&payload);
    bytes
}

// ============================================================================
// LISTENING
// ============================================================================

#[tokio::test]
async fn binds_every_configured_port() {
    let set = ListenerSet::bind(&ephemeral_config(4)).await.unwrap();
    let addrs = set.local_addrs().unwrap();

    assert_eq!(addrs.len(), 4);
    for addr in &addrs {
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }
}

#[tokio::test]
async fn bind_failure_is_fatal() {
    let first = ListenerSet::bind(&ephemeral_config(1)).await.unwrap();
    let taken = first.local_addrs().unwrap()[0].port();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        ports: vec![taken],
    };

    assert!(ListenerSet::bind(&config).await.is_err());
}

// ============================================================================
// CONNECTION HANDLING
// ============================================================================

#[tokio::test]
async fn serves_concurrent_connections_on_separate_ports() {
    let set = ListenerSet::bind(&ephemeral_config(2)).await.unwrap();
    let addrs = set.local_addrs().unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(set.run_with_shutdown(shutdown_rx));

    let mut clients = JoinSet::new();
    for (i, addr) in addrs.iter().copied().enumerate() {
        clients.spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            for n in 0..10u64 {
                stream.write_all(&tx((i % 2) as u8, n)).await.unwrap();
            }
            stream.shutdown().await.unwrap();
        });
    }
    while let Some(res) = clients.join_next().await {
        res.unwrap();
    }

    shutdown_tx.send(true).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn malformed_connection_does_not_poison_the_listener() {
    let set = ListenerSet::bind(&ephemeral_config(1)).await.unwrap();
    let addr = set.local_addrs().unwrap()[0];

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(set.run_with_shutdown(shutdown_rx));

    // Half a length prefix, then an abrupt close.
    let mut bad = TcpStream::connect(addr).await.unwrap();
    bad.write_all(&[0x00, 0x00]).await.unwrap();
    drop(bad);

    // A declared-but-undelivered payload, then an abrupt close.
    let mut torn = TcpStream::connect(addr).await.unwrap();
    torn.write_all(&20u32.to_be_bytes()).await.unwrap();
    torn.write_all(&[0xAB; 15]).await.unwrap();
    drop(torn);

    // The listener must still accept and serve a well-behaved client.
    let mut good = TcpStream::connect(addr).await.unwrap();
    good.write_all(&tx(0x01, 7)).await.unwrap();
    good.shutdown().await.unwrap();

    shutdown_tx.send(true).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn many_connections_on_one_port() {
    let set = ListenerSet::bind(&ephemeral_config(1)).await.unwrap();
    let addr = set.local_addrs().unwrap()[0];

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(set.run_with_shutdown(shutdown_rx));

    let mut clients = JoinSet::new();
    for n in 0..32u64 {
        clients.spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(&tx(0x00, n)).await.unwrap();
            stream.shutdown().await.unwrap();
        });
    }
    while let Some(res) = clients.join_next().await {
        res.unwrap();
    }

    shutdown_tx.send(true).unwrap();
    server.await.unwrap().unwrap();
}

// ============================================================================
// SHUTDOWN
// ============================================================================

#[tokio::test]
async fn shutdown_stops_all_accept_loops() {
    let set = ListenerSet::bind(&ephemeral_config(3)).await.unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = tokio::spawn(set.run_with_shutdown(shutdown_rx));

    shutdown_tx.send(true).unwrap();
    server.await.unwrap().unwrap();
}
