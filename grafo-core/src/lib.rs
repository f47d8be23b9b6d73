//! Graph-theory computation engine.
//!
//! A [`Graph`] owns vertices, weighted edges and attribute bags; algorithm
//! families borrow it and return typed, serializable results. The
//! [`registry`] dispatches the same operations by stable name and the
//! [`Engine`] applies workspace defaults on top.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod budget;
mod convergence;
mod engine;
mod error;
mod format;
mod graph;
mod paths;
mod union_find;

pub mod centrality;
pub mod cliques;
pub mod coloring;
pub mod community;
pub mod cycles;
pub mod flow;
pub mod isomorphism;
pub mod matching;
pub mod planarity;
pub mod registry;
pub mod shortest_path;
pub mod spanning_tree;
pub mod spectral;
pub mod topological;
pub mod tsp;

#[cfg(test)]
mod test_utils;

pub use crate::{
    budget::SearchBudget,
    convergence::IterationControl,
    engine::{Engine, EngineBuilder},
    error::{
        AlgorithmError, AlgorithmErrorCode, ErrorKind, GraphError, GraphErrorCode, GraphResult,
        Result,
    },
    format::GraphFormat,
    graph::{AttributeValue, Attributes, Edge, Graph, IndexedGraph, Neighbor, VertexId, WEIGHT_KEY},
};
