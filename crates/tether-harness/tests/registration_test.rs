//! Registration handshake integration tests.
//!
//! Runs the full engine against the scripted peer over Turmoil's simulated
//! network and verifies the REGISTER-first invariant end to end.

use tether_core::{Config, Engine};
use tether_harness::{RecordingHandler, SimPeer, SimTransport};
use tether_proto::{Message, MessageType};

fn engine_config(identity: &str) -> Config {
    let mut config = Config::new(identity);
    config.host = "peer".to_string();
    config
}

#[test]
fn register_is_the_first_frame_and_carries_the_identity() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("peer", || async {
        let peer = SimPeer::bind("0.0.0.0:7051").await?;
        let mut session = peer.accept().await?;

        // expect_register fails the host if anything other than REGISTER
        // with this identity arrives first
        session.expect_register("mycc").await?;

        // drive one keepalive round-trip so the engine has provably
        // processed the REGISTERED ack before we complete the stream
        session.send(&Message::keepalive()).await?;
        let echoed = session.recv().await?;
        assert_eq!(echoed.map(|m| m.message_type()), Some(MessageType::Keepalive));

        session.complete();
        Ok(())
    });

    sim.client("chaincode", async {
        let handler = RecordingHandler::default();
        let probe = handler.clone();

        let engine = Engine::new(engine_config("mycc"), SimTransport);
        engine.run(handler).await?;

        assert_eq!(probe.types_seen(), vec![MessageType::Registered, MessageType::Keepalive]);
        Ok(())
    });

    sim.run().expect("simulation should complete");
}

#[test]
fn wrong_identity_is_caught_by_the_peer() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("peer", || async {
        let peer = SimPeer::bind("0.0.0.0:7051").await?;
        let mut session = peer.accept().await?;

        let err = session.expect_register("expected_cc").await.unwrap_err();
        assert!(err.to_string().contains("identity"));

        session.complete();
        Ok(())
    });

    sim.client("chaincode", async {
        let engine = Engine::new(engine_config("other_cc"), SimTransport);
        // peer hangs up after the mismatch; the engine sees completion
        engine.run(RecordingHandler::default()).await?;
        Ok(())
    });

    sim.run().expect("simulation should complete");
}

#[test]
fn connection_refused_is_a_registration_error() {
    let mut sim = turmoil::Builder::new().build();

    // host exists but nothing listens on the chaincode-support port
    sim.host("peer", || async { Ok(()) });

    sim.client("chaincode", async {
        let engine = Engine::new(engine_config("mycc"), SimTransport);
        let err = engine.run(RecordingHandler::default()).await.unwrap_err();
        assert!(matches!(
            err,
            tether_core::EngineError::Registration(tether_core::StreamError::Io(_))
        ));
        Ok(())
    });

    sim.run().expect("simulation should complete");
}
