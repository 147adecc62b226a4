#[cfg(test)]
mod tests {
    use grid_netsim::{AnimatorState, Emission, NetworkError, NetworkSimulator, NodeId};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn triangle() -> NetworkSimulator {
        let mut sim = NetworkSimulator::default();
        sim.add_node("A", 0, 0).unwrap();
        sim.add_node("B", 1, 0).unwrap();
        sim.add_node("C", 2, 0).unwrap();
        sim.add_connection("A", "B", 2.0).unwrap();
        sim.add_connection("B", "C", 3.0).unwrap();
        sim.add_connection("A", "C", 10.0).unwrap();
        sim
    }

    // ========== Graph Store ==========

    #[test]
    fn test_duplicate_node_leaves_store_untouched() {
        let mut sim = triangle();
        let before = sim.nodes();
        let err = sim.add_node("B", 7, 7).unwrap_err();
        assert_eq!(err, NetworkError::DuplicateNode(id("B")));
        assert_eq!(sim.nodes(), before);
    }

    #[test]
    fn test_remove_node_leaves_no_dangling_edges() {
        let mut sim = triangle();
        sim.remove_node(&id("B")).unwrap();
        assert_eq!(sim.connections().len(), 1);
        for conn in sim.connections() {
            assert!(sim.graph().contains(&conn.source), "dangling source {}", conn.source);
            assert!(sim.graph().contains(&conn.target), "dangling target {}", conn.target);
        }
        assert!(sim.neighbors(&id("B")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_queries_do_not_mutate() {
        let sim = triangle();
        let nodes = sim.nodes();
        let conns = sim.connections().to_vec();
        for _ in 0..10 {
            assert_eq!(sim.nodes(), nodes);
            assert_eq!(sim.connections(), conns.as_slice());
            let _ = sim.neighbors(&id("A"));
        }
    }

    // ========== Path Finder ==========

    #[test]
    fn test_triangle_shortest_path() {
        let mut sim = triangle();
        let path = sim.find_path(&id("A"), &id("C")).expect("A->C should route");
        assert_eq!(path.nodes, vec![id("A"), id("B"), id("C")]);
        assert_eq!(path.cost(), 5.0);
    }

    #[test]
    fn test_path_reroutes_after_edit() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();

        // Drop the A-B link; only the direct expensive link remains.
        let ab = sim.connections()[0].id;
        sim.remove_connection(ab).unwrap();
        assert!(sim.current_path().is_none(), "stale path served after edit");

        let path = sim.find_path(&id("A"), &id("C")).unwrap();
        assert_eq!(path.nodes, vec![id("A"), id("C")]);
        assert_eq!(path.cost(), 10.0);
    }

    #[test]
    fn test_disconnected_components_have_no_path() {
        let mut sim = triangle();
        sim.add_node("X", 8, 8).unwrap();
        sim.add_node("Y", 9, 8).unwrap();
        sim.add_connection("X", "Y", 1.0).unwrap();
        let err = sim.find_path(&id("A"), &id("Y")).unwrap_err();
        assert_eq!(err, NetworkError::NoPathFound { from: id("A"), to: id("Y") });
        assert!(sim.current_path().is_none());
    }

    // ========== Packet Animator ==========

    #[test]
    fn test_packet_walks_path_then_clears() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();

        let (_, first) = sim.simulate("hello").unwrap();
        assert_eq!(first.node(), Some(&id("A")));
        assert_eq!(sim.tick().unwrap().node(), Some(&id("B")));
        assert_eq!(sim.tick().unwrap().node(), Some(&id("C")));

        let done = sim.tick().unwrap();
        assert!(matches!(done, Emission::Cleared { packet_id: 0 }));
        assert_eq!(sim.animator().state(), AnimatorState::Done);
        assert!(sim.animator().packet().is_none());
        assert!(sim.tick().is_none());
    }

    #[test]
    fn test_cancel_mid_run_stops_emissions() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        let (run, _) = sim.simulate("hello").unwrap();
        sim.tick_run(run).unwrap();

        sim.cancel();
        assert_eq!(sim.animator().state(), AnimatorState::Idle);
        assert!(sim.animator().packet().is_none());

        let trace_len = sim.trace().len();
        for _ in 0..5 {
            assert!(sim.tick_run(run).is_none());
            assert!(sim.tick().is_none());
        }
        assert_eq!(sim.trace().len(), trace_len);
    }

    #[test]
    fn test_second_simulation_replaces_first() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        let (first_run, _) = sim.simulate("one").unwrap();
        sim.tick();
        let (second_run, _) = sim.simulate("two").unwrap();

        // Timer of the first run fires late: must not move the packet.
        assert!(sim.tick_run(first_run).is_none());
        match sim.tick_run(second_run) {
            Some(Emission::At { node, message, .. }) => {
                assert_eq!(node, id("B"));
                assert_eq!(message, "two");
            }
            other => panic!("expected emission at B, got {other:?}"),
        }
    }

    #[test]
    fn test_removing_node_on_route_stops_running_packet() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        let (run, _) = sim.simulate("doomed").unwrap();
        sim.remove_node(&id("B")).unwrap();

        assert_eq!(sim.animator().state(), AnimatorState::Idle);
        assert!(sim.animator().packet().is_none());
        assert!(sim.tick().is_none());
        assert!(sim.tick_run(run).is_none());
        assert!(sim.trace().iter().all(|r| r.node != id("B")));
    }

    #[test]
    fn test_emissions_carry_processing_time() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        sim.simulate("timed").unwrap();
        let mut times = vec![0.0];
        while let Some(Emission::At { elapsed_time, .. }) = sim.tick() {
            times.push(elapsed_time);
        }
        let expected = [0.0, 2.1, 5.2];
        assert_eq!(times.len(), expected.len());
        for (got, want) in times.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "time {got} != {want}");
        }
    }

    #[test]
    fn test_restarted_packet_gets_its_own_trace() {
        let mut sim = triangle();
        sim.find_path(&id("A"), &id("C")).unwrap();
        sim.simulate("first").unwrap();
        sim.tick();
        sim.cancel();
        sim.simulate("second").unwrap();
        sim.tick();

        let rows: Vec<_> = sim.trace().iter().map(|r| (r.tick, r.hops, r.packet_id)).collect();
        assert_eq!(rows, vec![(0, 0, 1), (1, 1, 1)]);
    }

    #[test]
    fn test_trace_follows_packets() {
        let mut sim = triangle();
        sim.find_path(&id("C"), &id("A")).unwrap();
        sim.simulate("back").unwrap();
        while sim.tick().is_some() {}

        let trace = sim.trace();
        assert_eq!(trace.len(), 3);
        assert!(trace.iter().all(|r| r.packet_id == 0));
        assert_eq!(trace.iter().map(|r| r.hops).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(trace.last().map(|r| r.elapsed_latency), Some(5.0));

        sim.clear_trace();
        assert!(sim.trace().is_empty());
    }
}
