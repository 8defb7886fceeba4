//! Composite (oracle) gates: named, reusable sub-circuit templates.
//!
//! A [`GateTemplate`] stores an instruction list expressed in local qubit
//! indices `0..qubit_num`. Instantiating it at a set of global positions
//! deep-copies the template with every position remapped, producing a single
//! gate instruction whose [`CompositeGate::insides`] hold the expansion.
//! Templates live in a [`GateRegistry`], an explicit value with no global
//! state; registration is an append-only, name-keyed write and needs external
//! synchronization if shared across writer threads, while lookups on a
//! registered name are read-only.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::QubitId;

/// A bound instance of a registered composite gate.
///
/// The instance exposes only its bound global positions to schedulers and
/// renderers; `insides` are the remapped expansion for execution
/// collaborators and are never rendered inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeGate {
    /// Name the template was registered under.
    pub name: String,
    /// Bind-time parameters carried by this instance.
    pub params: Vec<f64>,
    /// Template instructions remapped onto global positions.
    pub insides: Vec<Instruction>,
}

/// A named sub-circuit template in local qubit indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateTemplate {
    name: String,
    qubit_num: u32,
    template: Vec<Instruction>,
}

impl GateTemplate {
    /// Create a template over local indices `0..qubit_num`.
    ///
    /// Every position referenced by the template, including positions inside
    /// conditional bodies and nested composite expansions, must be a local
    /// index below `qubit_num`.
    pub fn new(
        name: impl Into<String>,
        qubit_num: u32,
        template: Vec<Instruction>,
    ) -> IrResult<Self> {
        for ins in &template {
            check_local(ins, qubit_num)?;
        }
        Ok(Self {
            name: name.into(),
            qubit_num,
            template,
        })
    }

    /// The registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits an instance binds.
    pub fn qubit_num(&self) -> u32 {
        self.qubit_num
    }

    /// The template instructions in local indices.
    pub fn template(&self) -> &[Instruction] {
        &self.template
    }

    /// Instantiate the template at the given global positions.
    ///
    /// `positions[i]` becomes the global position of local index `i`. The
    /// returned instruction exposes the bound positions as its operands and
    /// carries the remapped template as its expansion. Template positions
    /// are revalidated here, so a template obtained by deserialization
    /// rather than [`GateTemplate::new`] fails the same way.
    pub fn construct(
        &self,
        positions: &[QubitId],
        params: Vec<f64>,
        label: Option<&str>,
    ) -> IrResult<Instruction> {
        if positions.len() != self.qubit_num as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: self.name.clone(),
                expected: self.qubit_num,
                got: positions.len() as u32,
            });
        }
        let mut seen = FxHashSet::default();
        for &q in positions {
            if !seen.insert(q) {
                return Err(IrError::DuplicateQubit { qubit: q });
            }
        }
        for ins in &self.template {
            check_local(ins, self.qubit_num)?;
        }

        let insides = self
            .template
            .iter()
            .map(|ins| {
                let mut ins = ins.clone();
                remap(&mut ins, positions);
                ins
            })
            .collect();

        let mut gate = Gate::composite(CompositeGate {
            name: self.name.clone(),
            params,
            insides,
        });
        if let Some(label) = label {
            gate = gate.with_label(label);
        }
        Ok(Instruction::gate(gate, positions.iter().copied()))
    }
}

/// Rewrite every position through `local -> map[local]`, recursing into
/// conditional bodies and nested composite expansions.
fn remap(ins: &mut Instruction, map: &[QubitId]) {
    for q in &mut ins.qubits {
        *q = map[q.index()];
    }
    match &mut ins.kind {
        InstructionKind::Cif(block) => {
            if let Some(body) = block.body_mut() {
                for inner in body {
                    remap(inner, map);
                }
            }
        }
        InstructionKind::Gate(gate) => {
            if let GateKind::Composite(composite) = &mut gate.kind {
                for inner in &mut composite.insides {
                    remap(inner, map);
                }
            }
        }
        _ => {}
    }
}

fn check_local(ins: &Instruction, qubit_num: u32) -> IrResult<()> {
    for &q in &ins.qubits {
        if q.0 >= qubit_num {
            return Err(IrError::QubitOutOfRange {
                qubit: q,
                num_qubits: qubit_num as usize,
            });
        }
    }
    match &ins.kind {
        InstructionKind::Cif(block) => {
            for inner in block.body() {
                check_local(inner, qubit_num)?;
            }
        }
        InstructionKind::Gate(gate) => {
            if let GateKind::Composite(composite) = &gate.kind {
                for inner in &composite.insides {
                    check_local(inner, qubit_num)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Name-keyed store of composite gate templates.
#[derive(Debug, Clone, Default)]
pub struct GateRegistry {
    templates: FxHashMap<String, GateTemplate>,
}

impl GateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under its name.
    ///
    /// Fails without touching the existing entry if the name is taken.
    pub fn register(&mut self, template: GateTemplate) -> IrResult<()> {
        if self.templates.contains_key(template.name()) {
            return Err(IrError::GateNameTaken {
                name: template.name().to_owned(),
            });
        }
        self.templates.insert(template.name().to_owned(), template);
        Ok(())
    }

    /// Whether a template is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Look up a registered template.
    pub fn get(&self, name: &str) -> Option<&GateTemplate> {
        self.templates.get(name)
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Instantiate a registered template at the given global positions.
    pub fn instantiate(
        &self,
        name: &str,
        positions: &[QubitId],
        params: Vec<f64>,
        label: Option<&str>,
    ) -> IrResult<Instruction> {
        let template = self.get(name).ok_or_else(|| IrError::GateNotRegistered {
            name: name.to_owned(),
        })?;
        template.construct(positions, params, label)
    }
}
