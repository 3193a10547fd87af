// In-process map view - Tracks what the page's map widget should show
use crate::application::ports::{MapDisplay, MapHandle, MapOptions, MarkerHandle};
use crate::domain::coordinate::Coordinate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub id: u64,
    pub center: Coordinate,
    pub zoom: u8,
    pub gesture_handling: String,
    pub markers: Vec<Coordinate>,
    pub resize_count: u32,
}

#[derive(Debug)]
struct MapState {
    center: Coordinate,
    options: MapOptions,
    resize_count: u32,
}

#[derive(Debug)]
struct MarkerState {
    map: u64,
    position: Coordinate,
}

#[derive(Debug, Default)]
struct Surface {
    maps: HashMap<u64, MapState>,
    markers: HashMap<u64, MarkerState>,
}

#[derive(Debug, Default)]
pub struct HeadlessMap {
    next_id: AtomicU64,
    surface: Mutex<Surface>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn surface(&self) -> MutexGuard<'_, Surface> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current state of every map, ordered by id
    pub fn snapshot(&self) -> Vec<MapSnapshot> {
        let surface = self.surface();
        let mut maps: Vec<MapSnapshot> = surface
            .maps
            .iter()
            .map(|(id, state)| {
                let mut markers: Vec<(u64, Coordinate)> = surface
                    .markers
                    .iter()
                    .filter(|(_, m)| m.map == *id)
                    .map(|(marker_id, m)| (*marker_id, m.position))
                    .collect();
                markers.sort_by_key(|(marker_id, _)| *marker_id);

                MapSnapshot {
                    id: *id,
                    center: state.center,
                    zoom: state.options.zoom,
                    gesture_handling: state.options.gesture_handling.clone(),
                    markers: markers.into_iter().map(|(_, p)| p).collect(),
                    resize_count: state.resize_count,
                }
            })
            .collect();
        maps.sort_by_key(|m| m.id);
        maps
    }
}

impl MapDisplay for HeadlessMap {
    fn create(&self, center: Coordinate, options: &MapOptions) -> anyhow::Result<MapHandle> {
        let id = self.allocate_id();
        self.surface().maps.insert(
            id,
            MapState {
                center,
                options: options.clone(),
                resize_count: 0,
            },
        );
        tracing::debug!("Created map {} at {}", id, center);
        Ok(MapHandle(id))
    }

    fn set_center(&self, map: MapHandle, center: Coordinate) -> anyhow::Result<()> {
        let mut surface = self.surface();
        let Some(state) = surface.maps.get_mut(&map.0) else {
            anyhow::bail!("Unknown map {}", map.0);
        };
        state.center = center;
        Ok(())
    }

    fn create_marker(&self, map: MapHandle, position: Coordinate) -> anyhow::Result<MarkerHandle> {
        let id = self.allocate_id();
        let mut surface = self.surface();
        if !surface.maps.contains_key(&map.0) {
            anyhow::bail!("Unknown map {}", map.0);
        }
        surface.markers.insert(id, MarkerState { map: map.0, position });
        Ok(MarkerHandle(id))
    }

    fn set_marker_position(&self, marker: MarkerHandle, position: Coordinate) -> anyhow::Result<()> {
        let mut surface = self.surface();
        let Some(state) = surface.markers.get_mut(&marker.0) else {
            anyhow::bail!("Unknown marker {}", marker.0);
        };
        state.position = position;
        Ok(())
    }

    fn trigger_resize(&self, map: MapHandle) -> anyhow::Result<()> {
        let mut surface = self.surface();
        let Some(state) = surface.maps.get_mut(&map.0) else {
            anyhow::bail!("Unknown map {}", map.0);
        };
        state.resize_count += 1;
        Ok(())
    }
}
