use rand::rngs::StdRng;
use rand::SeedableRng;
use skillgraph_core::{
    build_graph, compute_snapshot, EngineConfig, GraphEdge, GraphRecords, LayoutConfig, NodeId,
    NodeKind, NodeShape, Objective, Position, Rubric, Skill, Stage, StageNodeRecord, WorkItem,
};
use std::collections::BTreeMap;
use uuid::Uuid;

fn records() -> GraphRecords {
    let mut skill = Skill::new(Uuid::new_v4(), "Cooking", Stage::Foundation);
    skill.position = Some(Position::new(10.0, 20.0));
    let stage = StageNodeRecord::new(Uuid::new_v4(), skill.skill_id, Stage::Foundation);
    let linked = WorkItem::new(Uuid::new_v4(), "knife skills").linked_to_stage(stage.stage_node_id);
    let loose = WorkItem::new(Uuid::new_v4(), "grocery run");
    let objective = Objective::new(Uuid::new_v4(), "Host dinner", Rubric::empty())
        .with_linked_ticket(loose.ticket_id)
        .with_linked_ticket(loose.ticket_id)
        .with_linked_ticket(Uuid::new_v4());

    GraphRecords {
        skills: vec![skill],
        stage_nodes: vec![stage],
        objectives: vec![objective],
        work_items: vec![linked, loose],
    }
}

fn edge(source: &NodeId, target: &NodeId) -> GraphEdge {
    GraphEdge {
        source: source.clone(),
        target: target.clone(),
    }
}

#[test]
fn identical_inputs_serialize_byte_identically() {
    let records = records();
    let config = EngineConfig::default();

    let stored = BTreeMap::new();
    let first = compute_snapshot(&records, &stored, &config, &mut StdRng::seed_from_u64(5));
    let second = compute_snapshot(&records, &stored, &config, &mut StdRng::seed_from_u64(5));

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn edges_follow_links_and_skip_dangling_or_duplicate_ones() {
    let records = records();
    let graph = build_graph(
        &records,
        &BTreeMap::new(),
        &LayoutConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );

    let skill = NodeId::for_record(NodeKind::Skill, records.skills[0].skill_id);
    let stage = NodeId::for_record(NodeKind::Stage, records.stage_nodes[0].stage_node_id);
    let objective = NodeId::for_record(NodeKind::Objective, records.objectives[0].objective_id);
    let linked = NodeId::for_record(NodeKind::Ticket, records.work_items[0].ticket_id);
    let loose = NodeId::for_record(NodeKind::Ticket, records.work_items[1].ticket_id);

    assert_eq!(
        graph.edges().to_vec(),
        vec![
            edge(&skill, &stage),
            edge(&loose, &objective),
            edge(&linked, &stage),
        ]
    );
    assert_eq!(graph.nodes().len(), 5);
}

#[test]
fn ticket_shape_depends_on_stage_link() {
    let records = records();
    let graph = build_graph(
        &records,
        &BTreeMap::new(),
        &LayoutConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );

    let linked = NodeId::for_record(NodeKind::Ticket, records.work_items[0].ticket_id);
    let loose = NodeId::for_record(NodeKind::Ticket, records.work_items[1].ticket_id);
    assert_eq!(graph.node(&linked).unwrap().shape, NodeShape::TicketCompact);
    assert_eq!(graph.node(&loose).unwrap().shape, NodeShape::TicketCard);
    assert_eq!(graph.node(&linked).unwrap().kind(), NodeKind::Ticket);
}

#[test]
fn stored_positions_win_over_record_and_random_placement() {
    let records = records();
    let skill = NodeId::for_record(NodeKind::Skill, records.skills[0].skill_id);
    let stage = NodeId::for_record(NodeKind::Stage, records.stage_nodes[0].stage_node_id);
    let stored = BTreeMap::from([
        (skill.clone(), Position::new(-5.0, -6.0)),
        (stage.clone(), Position::new(300.0, 400.0)),
    ]);

    let graph = build_graph(
        &records,
        &stored,
        &LayoutConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );
    assert_eq!(graph.node(&skill).unwrap().position, Position::new(-5.0, -6.0));
    assert_eq!(graph.node(&stage).unwrap().position, Position::new(300.0, 400.0));

    let unstored = build_graph(
        &records,
        &BTreeMap::new(),
        &LayoutConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );
    assert_eq!(unstored.node(&skill).unwrap().position, Position::new(10.0, 20.0));
}

#[test]
fn fallback_positions_are_seeded_and_inside_layout_area() {
    let records = records();
    let layout = LayoutConfig {
        fallback_width: 320.0,
        fallback_height: 240.0,
    };

    let first = build_graph(&records, &BTreeMap::new(), &layout, &mut StdRng::seed_from_u64(11));
    let second = build_graph(&records, &BTreeMap::new(), &layout, &mut StdRng::seed_from_u64(11));
    assert_eq!(first, second);

    for node in first.nodes().iter().filter(|node| node.kind() != NodeKind::Skill) {
        assert!((0.0..320.0).contains(&node.position.x), "{:?}", node.position);
        assert!((0.0..240.0).contains(&node.position.y), "{:?}", node.position);
    }
}

#[test]
fn removed_record_drops_its_node_and_edges() {
    let mut records = records();
    let removed = records.work_items.remove(1);
    let removed_id = NodeId::for_record(NodeKind::Ticket, removed.ticket_id);

    let graph = build_graph(
        &records,
        &BTreeMap::new(),
        &LayoutConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );

    assert!(graph.node(&removed_id).is_none());
    assert!(graph
        .edges()
        .iter()
        .all(|edge| edge.source != removed_id && edge.target != removed_id));
    let objective = NodeId::for_record(NodeKind::Objective, records.objectives[0].objective_id);
    assert_eq!(graph.incoming(&objective).count(), 0);
}

#[test]
fn skill_nodes_carry_per_stage_progress() {
    let records = records();
    let graph = build_graph(
        &records,
        &BTreeMap::new(),
        &LayoutConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );

    let skill = NodeId::for_record(NodeKind::Skill, records.skills[0].skill_id);
    let node = graph.node(&skill).unwrap();
    let per_stage = node.stage_progress.as_ref().unwrap();
    assert_eq!(per_stage.len(), Stage::ALL.len());
    assert!(per_stage.values().all(|progress| *progress == 0));
    assert_eq!(node.progress, Some(0));
}

#[test]
fn records_load_from_json_with_defaults() {
    let skill_id = Uuid::new_v4();
    let raw = format!(
        r#"{{
            "skills": [{{ "skill_id": "{skill_id}", "name": "Go", "current_stage": "foundation" }}],
            "work_items": []
        }}"#
    );

    let records: GraphRecords = serde_json::from_str(&raw).unwrap();
    assert_eq!(records.skills.len(), 1);
    assert!(records.objectives.is_empty());
    assert!(records.skills[0].position.is_none());
}
