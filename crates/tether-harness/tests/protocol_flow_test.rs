//! Dispatch semantics over the simulated network: keepalive echo, forward
//! flags, and FIFO ordering.

use tether_core::{Config, Engine};
use tether_harness::{RecordingHandler, RespondingHandler, SimPeer, SimTransport};
use tether_proto::{Message, MessageType};

fn engine_config() -> Config {
    let mut config = Config::new("mycc");
    config.host = "peer".to_string();
    config
}

fn transaction(txid: &str) -> Message {
    Message::new(MessageType::Transaction, txid, b"args".to_vec())
}

#[test]
fn keepalive_echo_precedes_the_transaction_response() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("peer", || async {
        let peer = SimPeer::bind("0.0.0.0:7051").await?;
        let mut session = peer.accept().await?;
        session.expect_register("mycc").await?;

        session.send(&Message::keepalive()).await?;
        session.send(&transaction("t1")).await?;

        // arrival order is processing order: the echo must come back
        // before the transaction's response — and exactly one echo, or the
        // second frame here would be another KEEPALIVE
        let first = session.recv().await?.ok_or("stream ended early")?;
        assert_eq!(first.message_type(), MessageType::Keepalive);

        let second = session.recv().await?.ok_or("stream ended early")?;
        assert_eq!(second.message_type(), MessageType::Response);
        assert_eq!(second.txid(), "t1");

        session.complete();
        Ok(())
    });

    sim.client("chaincode", async {
        let handler = RespondingHandler::default();
        let probe = handler.clone();

        let engine = Engine::new(engine_config(), SimTransport);
        engine.run(handler).await?;

        let types: Vec<_> = probe.seen().iter().map(Message::message_type).collect();
        assert_eq!(
            types,
            vec![
                MessageType::Registered,
                MessageType::Keepalive,
                MessageType::Transaction,
                MessageType::Response,
            ]
        );
        Ok(())
    });

    sim.run().expect("simulation should complete");
}

#[test]
fn unforwarded_transaction_produces_no_outbound_frame() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("peer", || async {
        let peer = SimPeer::bind("0.0.0.0:7051").await?;
        let mut session = peer.accept().await?;
        session.expect_register("mycc").await?;

        // the recording handler forwards nothing, so the trailing
        // keepalive echo is the only frame allowed to come back
        session.send(&transaction("quiet")).await?;
        session.send(&Message::keepalive()).await?;

        let first = session.recv().await?.ok_or("stream ended early")?;
        assert_eq!(first.message_type(), MessageType::Keepalive);

        session.complete();
        Ok(())
    });

    sim.client("chaincode", async {
        let handler = RecordingHandler::default();
        let probe = handler.clone();

        let engine = Engine::new(engine_config(), SimTransport);
        engine.run(handler).await?;

        assert_eq!(
            probe.types_seen(),
            vec![MessageType::Registered, MessageType::Transaction, MessageType::Keepalive]
        );
        Ok(())
    });

    sim.run().expect("simulation should complete");
}

#[test]
fn responses_come_back_in_transaction_order() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("peer", || async {
        let peer = SimPeer::bind("0.0.0.0:7051").await?;
        let mut session = peer.accept().await?;
        session.expect_register("mycc").await?;

        for i in 0..20 {
            session.send(&transaction(&format!("tx-{i}"))).await?;
        }

        for i in 0..20 {
            let response = session.recv().await?.ok_or("stream ended early")?;
            assert_eq!(response.message_type(), MessageType::Response);
            assert_eq!(response.txid(), format!("tx-{i}"));
        }

        session.complete();
        Ok(())
    });

    sim.client("chaincode", async {
        let engine = Engine::new(engine_config(), SimTransport);
        engine.run(RespondingHandler::default()).await?;
        Ok(())
    });

    sim.run().expect("simulation should complete");
}
