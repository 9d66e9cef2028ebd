//! Placement, selection and persistence engine for the tile-map level editor.
//!
//! The host (a browser shell or the headless `leveledit` binary) owns the
//! sprite sheet, the DOM widgets and the frame loop. This crate owns what sits
//! between them: translating pointer and drag-and-drop events into scene
//! mutations, hit-testing placed elements topmost-first, snapping to the tile
//! grid, and round-tripping the scene through its JSON document.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Input controller ([`engine::EngineCore`]) and the [`engine::Action`]s it emits |
//! | [`scene`] | Ordered element store, drag state, import/export |
//! | [`doc`] | Element and document types, categories, lenient number coercion |
//! | [`catalog`] | Sprite catalog seam and an in-memory manifest-backed catalog |
//! | [`viewport`] | Device-to-scene scale, scale selection and grid snapping |
//! | [`input`] | Drag state, palette source and scripted input events |
//! | [`hit`] | Point-in-rectangle tests, topmost-first |
//! | [`render`] | Read-only per-frame traversal over a drawing [`render::Surface`] |
//! | [`autosave`] | Periodic element backup to a key-value store |
//! | [`consts`] | Shared numeric constants and storage keys |

pub mod autosave;
pub mod catalog;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod scene;
pub mod viewport;
