//! Integration tests for the layout crate: event-driven use through
//! `LayoutPlugin`, and whole-layout generation runs over the fixture catalog.
