use bevy::prelude::*;

use super::*;
use crate::catalog::AssetPath;

fn request(cell: IVec2, asset: &str) -> LoadRequest {
    LoadRequest::new(
        cell,
        AssetPath::from(asset),
        Vec3::new(cell.x as f32 * 10.0, 0.0, cell.y as f32 * 10.0),
        Quat::IDENTITY,
        format!("LayoutCell_{}_{}_Sublevel", cell.x, cell.y),
    )
}

fn one_entity(request: &LoadRequest) -> LoadedInstance {
    LoadedInstance::new(vec![ContentEntity::new(
        "Root",
        Bounds::new(request.position, Vec3::splat(1.0)),
    )])
}

#[test]
fn test_request_flags() {
    let r = request(IVec2::ZERO, "a");
    assert!(!r.visible);
    assert!(!r.block_on_load);
    assert!(!r.block_on_unload);
    assert!(!r.distance_streaming);
}

#[test]
fn test_unknown_asset_is_refused() {
    let mut streamer = QueuedStreamer::new();
    assert!(streamer.load_instance(request(IVec2::ZERO, "nowhere")).is_none());
    assert_eq!(streamer.live_instances(), 0);
    assert!(streamer.requests().is_empty());
}

#[test]
fn test_deferred_load_completes_on_poll() {
    let mut streamer = QueuedStreamer::new().with_asset("a", one_entity);
    let ticket = streamer.load_instance(request(IVec2::new(2, 1), "a")).unwrap();
    assert!(ticket.immediate.is_none());
    assert_eq!(streamer.pending(), 1);

    let done = streamer.poll_completed();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].instance, ticket.handle.id());
    assert_eq!(done[0].cell, IVec2::new(2, 1));
    assert_eq!(done[0].content.entities[0].bounds.center, Vec3::new(20.0, 0.0, 10.0));
    assert!(streamer.poll_completed().is_empty());
}

#[test]
fn test_synchronous_load_is_immediate() {
    let mut streamer = QueuedStreamer::new().synchronous().with_asset("a", one_entity);
    let ticket = streamer.load_instance(request(IVec2::ZERO, "a")).unwrap();
    assert!(ticket.immediate.is_some());
    assert_eq!(streamer.pending(), 0);
}

#[test]
fn test_dropping_handle_releases_instance() {
    let mut streamer = QueuedStreamer::new().with_asset("a", one_entity);
    let first = streamer.load_instance(request(IVec2::ZERO, "a")).unwrap();
    let second = streamer.load_instance(request(IVec2::ONE, "a")).unwrap();
    assert_eq!(streamer.live_instances(), 2);

    let released = first.handle.id();
    drop(first);
    streamer.process_releases();
    assert_eq!(streamer.live_instances(), 1);
    assert_eq!(streamer.released(), [released]);
    drop(second);
}

#[test]
fn test_released_instance_still_completes() {
    let mut streamer = QueuedStreamer::new().with_asset("a", one_entity);
    let ticket = streamer.load_instance(request(IVec2::ZERO, "a")).unwrap();
    let id = ticket.handle.id();
    drop(ticket);
    let done = streamer.poll_completed();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].instance, id);
    assert_eq!(streamer.live_instances(), 0);
}

#[test]
fn test_instance_ids_are_unique() {
    let mut streamer = QueuedStreamer::new().with_asset("a", one_entity);
    let a = streamer.load_instance(request(IVec2::ZERO, "a")).unwrap();
    let b = streamer.load_instance(request(IVec2::ZERO, "a")).unwrap();
    assert_ne!(a.handle.id(), b.handle.id());
    assert_eq!(format!("{}", InstanceId(7)), "#7");
}

#[test]
fn test_bounds_are_strict() {
    let bounds = Bounds::new(Vec3::new(10.0, 0.0, 10.0), Vec3::new(5.0, 1.0, 5.0));
    assert!(bounds.contains(Vec3::new(10.0, 0.0, 10.0)));
    assert!(bounds.contains(Vec3::new(14.9, 0.5, 5.1)));
    assert!(!bounds.contains(Vec3::new(15.0, 0.0, 10.0)));
    assert!(!bounds.contains(Vec3::new(10.0, 2.0, 10.0)));
    assert!(!bounds.contains(Vec3::new(4.0, 0.0, 10.0)));
}

#[test]
fn test_loaded_instance_contains_point() {
    let instance = one_entity(&request(IVec2::new(1, 0), "a"));
    assert!(instance.contains_point(Vec3::new(10.5, 0.0, 0.0)));
    assert!(!instance.contains_point(Vec3::ZERO));
}
