/*! Integration tests for Graft.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - element: Identity, equality, and container semantics of the element tree
 * - mapping: End-to-end element↔object round trips through the mapper
 * - cycles: Self-referential data in both directions
 * - codecs: JSON and TOML interchange against the mapper
 */

mod codecs;
mod cycles;
mod element;
mod helpers;
mod mapping;
