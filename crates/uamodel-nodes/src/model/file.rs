// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `FileType` (i=11575).

use std::sync::Arc;

use uamodel_core::{DateTime, NodeId};

use super::TypedNode;
use crate::node::{MethodNode, ObjectNode};

/// Property descriptors.
pub mod properties {
    use uamodel_core::data_type::value_rank::SCALAR;
    use uamodel_core::{DateTime, ExpandedNodeId, OPC_UA_NAMESPACE_URI as UA};

    use crate::property::QualifiedProperty;

    /// `Size`: UInt64.
    pub const SIZE: QualifiedProperty<u64> = QualifiedProperty::new(UA, "Size", ExpandedNodeId::ns0(9), SCALAR);
    /// `Writable`: Boolean.
    pub const WRITABLE: QualifiedProperty<bool> =
        QualifiedProperty::new(UA, "Writable", ExpandedNodeId::ns0(1), SCALAR);
    /// `UserWritable`: Boolean.
    pub const USER_WRITABLE: QualifiedProperty<bool> =
        QualifiedProperty::new(UA, "UserWritable", ExpandedNodeId::ns0(1), SCALAR);
    /// `OpenCount`: UInt16.
    pub const OPEN_COUNT: QualifiedProperty<u16> =
        QualifiedProperty::new(UA, "OpenCount", ExpandedNodeId::ns0(5), SCALAR);
    /// `MimeType`: String.
    pub const MIME_TYPE: QualifiedProperty<String> =
        QualifiedProperty::new(UA, "MimeType", ExpandedNodeId::ns0(12), SCALAR);
    /// `MaxByteStringLength`: UInt32.
    pub const MAX_BYTE_STRING_LENGTH: QualifiedProperty<u32> =
        QualifiedProperty::new(UA, "MaxByteStringLength", ExpandedNodeId::ns0(7), SCALAR);
    /// `LastModifiedTime`: DateTime.
    pub const LAST_MODIFIED_TIME: QualifiedProperty<DateTime> =
        QualifiedProperty::new(UA, "LastModifiedTime", ExpandedNodeId::ns0(13), SCALAR);
}

/// Bits of the `Open` mode argument.
pub mod open_mode {
    /// Open for reading.
    pub const READ: u8 = 0x01;
    /// Open for writing.
    pub const WRITE: u8 = 0x02;
    /// Truncate to zero length on open; requires `WRITE`.
    pub const ERASE_EXISTING: u8 = 0x04;
    /// Position at the end of the file; requires `WRITE`.
    pub const APPEND: u8 = 0x08;
}

method_signature! {
    /// `Open(Mode) -> FileHandle`.
    OpenMethod = "Open";
    inputs [
        "Mode": u8 = (uamodel_core::ExpandedNodeId::ns0(3), uamodel_core::data_type::value_rank::SCALAR, ""),
    ]
    outputs [
        "FileHandle": u32 = (uamodel_core::ExpandedNodeId::ns0(7), uamodel_core::data_type::value_rank::SCALAR, ""),
    ]
}

method_signature! {
    /// `Close(FileHandle)`.
    CloseMethod = "Close";
    inputs [
        "FileHandle": u32 = (uamodel_core::ExpandedNodeId::ns0(7), uamodel_core::data_type::value_rank::SCALAR, ""),
    ]
    outputs []
}

method_signature! {
    /// `Read(FileHandle, Length) -> Data`.
    ReadMethod = "Read";
    inputs [
        "FileHandle": u32 = (uamodel_core::ExpandedNodeId::ns0(7), uamodel_core::data_type::value_rank::SCALAR, ""),
        "Length": i32 = (uamodel_core::ExpandedNodeId::ns0(6), uamodel_core::data_type::value_rank::SCALAR, ""),
    ]
    outputs [
        "Data": uamodel_core::ByteString = (
            uamodel_core::ExpandedNodeId::ns0(15),
            uamodel_core::data_type::value_rank::SCALAR,
            ""
        ),
    ]
}

method_signature! {
    /// `Write(FileHandle, Data)`.
    WriteMethod = "Write";
    inputs [
        "FileHandle": u32 = (uamodel_core::ExpandedNodeId::ns0(7), uamodel_core::data_type::value_rank::SCALAR, ""),
        "Data": uamodel_core::ByteString = (
            uamodel_core::ExpandedNodeId::ns0(15),
            uamodel_core::data_type::value_rank::SCALAR,
            ""
        ),
    ]
    outputs []
}

method_signature! {
    /// `GetPosition(FileHandle) -> Position`.
    GetPositionMethod = "GetPosition";
    inputs [
        "FileHandle": u32 = (uamodel_core::ExpandedNodeId::ns0(7), uamodel_core::data_type::value_rank::SCALAR, ""),
    ]
    outputs [
        "Position": u64 = (uamodel_core::ExpandedNodeId::ns0(9), uamodel_core::data_type::value_rank::SCALAR, ""),
    ]
}

method_signature! {
    /// `SetPosition(FileHandle, Position)`.
    SetPositionMethod = "SetPosition";
    inputs [
        "FileHandle": u32 = (uamodel_core::ExpandedNodeId::ns0(7), uamodel_core::data_type::value_rank::SCALAR, ""),
        "Position": u64 = (uamodel_core::ExpandedNodeId::ns0(9), uamodel_core::data_type::value_rank::SCALAR, ""),
    ]
    outputs []
}

/// Accessors of `FileType`.
pub trait FileType: TypedNode<Node = ObjectNode> {
    property_accessors! {
        "Size" => properties::SIZE: u64 { size, set_size, size_node }
        "Writable" => properties::WRITABLE: bool { writable, set_writable, writable_node }
        "UserWritable" => properties::USER_WRITABLE: bool { user_writable, set_user_writable, user_writable_node }
        "OpenCount" => properties::OPEN_COUNT: u16 { open_count, set_open_count, open_count_node }
        "MimeType" => properties::MIME_TYPE: String { mime_type, set_mime_type, mime_type_node }
        "MaxByteStringLength" => properties::MAX_BYTE_STRING_LENGTH: u32 {
            max_byte_string_length, set_max_byte_string_length, max_byte_string_length_node
        }
        "LastModifiedTime" => properties::LAST_MODIFIED_TIME: DateTime {
            last_modified_time, set_last_modified_time, last_modified_time_node
        }
    }

    /// Returns the `Open` method.
    fn open_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<OpenMethod>()
    }

    /// Returns the `Close` method.
    fn close_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<CloseMethod>()
    }

    /// Returns the `Read` method.
    fn read_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<ReadMethod>()
    }

    /// Returns the `Write` method.
    fn write_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<WriteMethod>()
    }

    /// Returns the `GetPosition` method.
    fn get_position_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<GetPositionMethod>()
    }

    /// Returns the `SetPosition` method.
    fn set_position_method_node(&self) -> Option<Arc<MethodNode>> {
        self.binding().method_node::<SetPositionMethod>()
    }
}

object_wrapper! {
    /// A `FileType` instance.
    FileTypeNode, NodeId::numeric(0, 11575)
}

impl FileType for FileTypeNode {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AddressSpace, NodeGraph};
    use crate::method::{handler_fn, InvocationContext, MethodSignature};
    use crate::reference_types;
    use uamodel_core::{BoxError, ByteString, QualifiedName, StatusCode, Variant};

    fn file() -> (Arc<AddressSpace>, FileTypeNode) {
        let space = Arc::new(AddressSpace::new());
        let id = NodeId::string(0, "Recipe");
        space
            .add_node(ObjectNode::builder(id.clone(), QualifiedName::new(0, "Recipe")).build().into())
            .unwrap();
        for name in [ReadMethod::BROWSE_NAME, OpenMethod::BROWSE_NAME] {
            let method = MethodNode::builder(NodeId::string(0, format!("Recipe.{}", name)), QualifiedName::new(0, name))
                .build();
            space.add_child(&id, reference_types::HAS_COMPONENT, method).unwrap();
        }
        (space.clone(), FileTypeNode::from_graph(space, &id).unwrap())
    }

    #[test]
    fn test_file_properties() {
        let (_, file) = file();
        file.set_size(1024).unwrap();
        file.set_mime_type("text/csv".to_string()).unwrap();
        file.set_open_count(0).unwrap();

        assert_eq!(file.size().unwrap(), Some(1024));
        assert_eq!(file.mime_type().unwrap().as_deref(), Some("text/csv"));
        assert_eq!(file.open_count().unwrap(), Some(0));
        assert_eq!(file.writable().unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_outputs_are_marshalled() {
        let (_, file) = file();
        let read = handler_fn::<ReadMethod, _, _>(|_, (handle, length): (u32, i32)| async move {
            if handle != 1 {
                return Err(BoxError::from(uamodel_core::UaException::from_status(
                    StatusCode::BAD_INVALID_ARGUMENT,
                )));
            }
            Ok((ByteString::from(vec![b'x'; length.max(0) as usize]),))
        });
        file.binding().install_method::<ReadMethod, _>(read);

        let handler = file.read_method_node().unwrap().handler().unwrap();
        let ctx = InvocationContext::new(file.node_id().clone(), NodeId::string(0, "Recipe.Read"));

        let outputs = handler.invoke(&ctx, &[Variant::UInt32(1), Variant::Int32(3)]).await.unwrap();
        assert_eq!(outputs, vec![Variant::ByteString(ByteString::from(b"xxx".to_vec()))]);
        assert_eq!(handler.output_arguments().unwrap()[0].name, "Data");

        let err = handler.invoke(&ctx, &[Variant::UInt32(1), Variant::UInt32(3)]).await.unwrap_err();
        assert_eq!(err.input_argument_results(), &[StatusCode::GOOD, StatusCode::BAD_TYPE_MISMATCH]);

        let err = handler.invoke(&ctx, &[Variant::UInt32(9), Variant::Int32(3)]).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_INVALID_ARGUMENT);
        assert!(err.handler_ran());
    }

    #[test]
    fn test_method_lookup_by_signature() {
        let (_, file) = file();
        assert!(file.open_method_node().is_some());
        assert!(file.read_method_node().is_some());
        assert!(file.close_method_node().is_none());
        assert!(file.set_position_method_node().is_none());
    }
}
