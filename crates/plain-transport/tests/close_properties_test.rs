//! Property tests for the two close triggers

use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;
use serde_json::Value;

use rvoip_plain_transport::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Close,
    RouterClosed,
}

fn trigger() -> impl Strategy<Value = Trigger> {
    prop_oneof![Just(Trigger::Close), Just(Trigger::RouterClosed)]
}

fn data(with_sctp: bool) -> PlainTransportData {
    let mut data = PlainTransportData::new(TransportTuple::new("0.0.0.0", 5000, TransportProtocol::Udp));
    if with_sctp {
        data.sctp_parameters = Some(SctpParameters {
            port: 5000,
            os: 1024,
            mis: 1024,
            max_message_size: 262144,
        });
        data.sctp_state = Some(SctpState::Connecting);
    }
    data
}

proptest! {
    #[test]
    fn close_triggers_converge(triggers in prop::collection::vec(trigger(), 1..8), with_sctp in any::<bool>()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let channel = Arc::new(MemoryChannel::new(Arc::new(
                |_method: &str, _internal: &Value, _data: Option<&Value>| -> Result<Value, String> {
                    Ok(Value::Null)
                },
            )));
            let transport = PlainTransport::new(PlainTransportParams {
                internal: TransportInternal::new("router-1", "transport-1"),
                data: data(with_sctp),
                channel: channel.clone(),
                app_data: Value::Null,
            })
            .unwrap();

            let own = Arc::new(Mutex::new(Vec::new()));
            let observed = Arc::new(Mutex::new(Vec::new()));
            let o = own.clone();
            transport.events().on_any(move |e| o.lock().push(e.clone()));
            let o = observed.clone();
            transport.observer().on_any(move |e| o.lock().push(e.clone()));

            for trigger in &triggers {
                match trigger {
                    Trigger::Close => transport.close(),
                    Trigger::RouterClosed => transport.router_closed(),
                }
            }

            assert!(transport.closed());
            assert!(!channel.has_subscriber("transport-1"));
            if with_sctp {
                assert_eq!(transport.sctp_state(), Some(SctpState::Closed));
            } else {
                assert_eq!(transport.sctp_state(), None);
            }

            let expected_own = match triggers[0] {
                Trigger::Close => TransportEvent::Close,
                Trigger::RouterClosed => TransportEvent::RouterClose,
            };
            assert_eq!(*own.lock(), vec![expected_own]);
            assert_eq!(*observed.lock(), vec![TransportEvent::Close]);
        });
    }
}
