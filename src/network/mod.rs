/*
 * This module defines the data model the resolver works on:
 * OVSDB topology nodes with their bridge, manager and port augmentations,
 * the forwarders placed onto them, and the encodings shared by both.
 */

pub mod address;
pub mod datapath;
pub mod forwarder;
pub mod node;
pub mod options;
