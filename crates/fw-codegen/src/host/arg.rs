//! Host-side marshalling of one ABI argument.

use fw_core::Intent;
use itertools::Itertools;

use crate::abi::{AbiArg, ArgKind};

/// Reinterprets a character array as raw bytes for the duration of the
/// call. `save` only reads the array and runs first; once any `acquire`
/// line has run, `release` must run on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView {
    pub save: Vec<String>,
    pub acquire: Vec<String>,
    pub release: Vec<String>,
}

/// Every fragment an argument contributes to its procedure wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Parameters of the host-callable signature.
    pub extern_decls: Vec<String>,
    /// Local temporaries.
    pub intern_decls: Vec<String>,
    pub pre_call: Vec<String>,
    pub post_call: Vec<String>,
    pub call_args: Vec<String>,
    pub return_names: Vec<String>,
    pub in_doc: Vec<String>,
    pub out_doc: Vec<String>,
    pub byte_view: Option<ByteView>,
}

#[derive(Debug, Clone)]
pub struct HostArg {
    pub abi: AbiArg,
    pub caps: Capabilities,
}

impl HostArg {
    pub fn new(abi: AbiArg) -> Self {
        let mut caps = match &abi.kind {
            ArgKind::Scalar(_) => scalar(&abi),
            ArgKind::FixedChar { len } => character(&abi, Some(len)),
            ArgKind::AssumedChar => character(&abi, None),
            ArgKind::Array { rank } => array(&abi, *rank),
            ArgKind::CharArray { rank, .. } => char_array(&abi, *rank),
        };
        if abi.is_external() {
            caps.in_doc.push(doc_line(&abi));
        }
        if abi.intent != Intent::In {
            caps.out_doc.push(doc_line(&abi));
        }
        Self { abi, caps }
    }

    pub fn name(&self) -> &str {
        &self.abi.name
    }
}

fn scalar(abi: &AbiArg) -> Capabilities {
    let (ty, name) = (&abi.type_name, &abi.name);
    let mut caps = Capabilities {
        call_args: vec![format!("&{name}")],
        ..Default::default()
    };
    if abi.is_external() {
        caps.extern_decls.push(format!("{ty} {name}"));
    } else {
        caps.intern_decls.push(format!("cdef {ty} {name}"));
    }
    if abi.in_return_tuple() {
        caps.return_names.push(name.clone());
    }
    caps
}

/// `len` is the declared length, `None` when it is taken from the value.
fn character(abi: &AbiArg, len: Option<&String>) -> Capabilities {
    let name = &abi.name;
    let (local, local_len, buf) = (
        format!("fw_{name}"),
        format!("fw_{name}_len"),
        format!("fw_{name}_buf"),
    );
    let mut caps = Capabilities::default();
    if abi.is_external() {
        caps.extern_decls.push(format!("fw_bytes {name}"));
    }
    caps.intern_decls.push(format!("cdef fw_bytes {local}"));
    caps.intern_decls
        .push(format!("cdef {} {local_len}", abi.extent_type));

    if abi.intent == Intent::In {
        caps.pre_call.push(format!("{local_len} = len({name})"));
        caps.pre_call.push(format!("{local} = {name}"));
        caps.call_args = vec![format!("&{local_len}"), format!("<char*>{local}")];
    } else {
        caps.intern_decls.push(format!("cdef char *{buf}"));
        caps.pre_call.push(match len {
            Some(len) => format!("{local_len} = {len}"),
            None => format!("{local_len} = len({name})"),
        });
        caps.pre_call.push(format!(
            "{local} = PyBytes_FromStringAndSize(NULL, {local_len})"
        ));
        caps.pre_call.push(format!("{buf} = <char*>{local}"));
        if abi.intent != Intent::Out {
            caps.pre_call.push(format!(
                "memcpy({buf}, <char*>{name}, {local_len}+1)"
            ));
        }
        caps.call_args = vec![format!("&{local_len}"), buf];
    }
    if abi.in_return_tuple() {
        caps.return_names.push(local);
    }
    caps
}

fn ndarray_decl(abi: &AbiArg, rank: usize) -> String {
    format!(
        "cdef np.ndarray[{}, ndim={rank}, mode='fortran'] {}_",
        abi.type_name, abi.name
    )
}

fn array(abi: &AbiArg, rank: usize) -> Capabilities {
    let (ty, name) = (&abi.type_name, &abi.name);
    let mut call_args: Vec<String> = (0..rank)
        .map(|dim| format!("<{}*>&{name}_.shape[{dim}]", abi.extent_type))
        .collect();
    call_args.push(format!("<{ty}*>{name}_.data"));
    Capabilities {
        extern_decls: vec![format!("object {name}")],
        intern_decls: vec![ndarray_decl(abi, rank)],
        pre_call: vec![format!(
            "{name}_ = np.PyArray_FROMANY({name}, {}, {rank}, {rank}, np.NPY_F_CONTIGUOUS)",
            abi.npy_enum
        )],
        call_args,
        return_names: if abi.in_return_tuple() {
            vec![format!("{name}_")]
        } else {
            Vec::new()
        },
        ..Default::default()
    }
}

/// The leading shape slot carries the character length, computed from the
/// byte view's element count.
fn char_array(abi: &AbiArg, rank: usize) -> Capabilities {
    let (ty, name) = (&abi.type_name, &abi.name);
    let shape = format!("{name}_shape");
    let extents = (1..=rank).map(|dim| format!("{shape}[{dim}]")).join("*");
    let save = vec![
        format!("{name}_odtype = {name}.dtype"),
        format!("for i in range({rank}): {shape}[i+1] = {name}.shape[i]"),
    ];
    let acquire = vec![
        format!("{name}.dtype = 'b'"),
        format!("{name}_ = {name}"),
        format!(
            "{shape}[0] = <{}>({name}_.size/({extents}))",
            abi.extent_type
        ),
    ];
    let mut call_args: Vec<String> = (0..=rank).map(|dim| format!("&{shape}[{dim}]")).collect();
    call_args.push(format!("<{ty}*>{name}_.data"));
    Capabilities {
        extern_decls: vec![format!("object {name}")],
        intern_decls: vec![
            ndarray_decl(abi, rank),
            format!("cdef {} {shape}[{}]", abi.extent_type, rank + 1),
        ],
        call_args,
        return_names: if abi.in_return_tuple() {
            vec![name.clone()]
        } else {
            Vec::new()
        },
        byte_view: Some(ByteView {
            save,
            acquire,
            release: vec![format!("{name}.dtype = {name}_odtype")],
        }),
        ..Default::default()
    }
}

/// `name : label[, len L][, <r>D array, dimension(...)][, intent X]`
fn doc_line(abi: &AbiArg) -> String {
    let mut line = format!("{} : {}", abi.name, abi.dtype.label());
    if let Some(len) = abi.dtype.char_len() {
        line.push_str(&format!(", len {len}"));
    }
    if abi.rank() > 0 {
        line.push_str(&format!(
            ", {}D array, dimension({})",
            abi.rank(),
            abi.dimension.join(", ")
        ));
    }
    if let Some(intent) = abi.intent.as_str() {
        line.push_str(&format!(", intent {intent}"));
    }
    line
}
