//! End-to-end backend tests
//!
//! The textual backends run on inline sources; the C++ backends run on the package tree under `tests/fixtures/idl`,
//! where `robot.Motion` uses the `geo.Point` struct of another package.
//!
//! Run with: `cargo test --test codegen_tests`

use std::path::PathBuf;

use qilang::backend::{Backend, CodegenOptions, generate};
use qilang::backend::qilang::format_qilang;
use qilang::backend::sexpr::format_sexpr;
use qilang::diagnostics::DiagnosticManager;
use qilang::PackageManager;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/idl")
}

/// Generate `backend` output for the fixture file `relative`, after analysing its package.
fn generate_fixture(backend: Backend, relative: &str) -> (String, DiagnosticManager) {
    let mut pm = PackageManager::new();
    pm.add_include(fixtures());
    let file = pm.parse_file(&fixtures().join(relative)).expect("fixture should parse");
    pm.anal(Some(&file.package)).expect("fixture should resolve");
    let mut diagnostics = DiagnosticManager::new();
    let out = generate(backend, &pm, &file, &mut diagnostics, CodegenOptions::default()).expect("generation failed");
    (out, diagnostics)
}

// ============================================================================
// Textual backends
// ============================================================================

#[test]
fn test_interface_dumps() {
    let ast = qilang_syntax::parse_source("package test\ninterface X\n  fn ping() int32\nend\n", "test/x.qi").unwrap();

    let qilang = format_qilang(&ast, CodegenOptions::default());
    assert!(qilang.contains("interface X"));
    assert!(qilang.contains("fn ping() int32"));
    assert!(qilang.contains("end"));

    let sexpr = format_sexpr(&ast, CodegenOptions::default());
    assert!(sexpr.contains("(fn ping () (type int32))"));
}

#[test]
fn test_textual_backends_need_no_resolution() {
    let mut pm = PackageManager::new();
    let file = pm.parse_file(&fixtures().join("robot/motion.qi")).unwrap();
    let mut diagnostics = DiagnosticManager::new();

    let out = generate(Backend::Qilang, &pm, &file, &mut diagnostics, CodegenOptions::default()).unwrap();
    let reparsed = qilang_syntax::parse_source(&out, "robot/motion.qi").unwrap();
    assert!(reparsed.same_structure(&file.ast));
}

#[test]
fn test_doc_backend() {
    let (out, diagnostics) = generate_fixture(Backend::Doc, "robot/motion.qi");
    assert!(diagnostics.is_empty());

    let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
    let motion = &doc["Motion"];
    assert_eq!(motion["type"], "interface");
    assert_eq!(motion["brief"], "Moves the robot around");

    let move_to = &motion["members"]["moveTo"];
    assert_eq!(move_to["type"], "method");
    assert_eq!(move_to["brief"], "Move to a target");
    assert_eq!(move_to["return"], "bool");
    assert_eq!(move_to["returnDescription"], "true when reached");
    assert_eq!(move_to["parameters"]["target"]["type"], "Point");
    assert_eq!(move_to["parameters"]["target"]["description"], "where to go");

    assert_eq!(motion["members"]["stop"]["return"], "nothing");
    assert_eq!(motion["members"]["moved"]["type"], "signal");
    assert_eq!(motion["members"]["speed"]["type"], "property");
}

// ============================================================================
// C++ backends
// ============================================================================

#[test]
fn test_cpp_interface_uses_other_package_types() {
    let (out, _) = generate_fixture(Backend::CppInterface, "robot/motion.qi");
    assert!(out.contains("#ifndef QILANG_GEN_ROBOT_MOTION_HPP_\n"));
    assert!(out.contains("#include <geo/point.hpp>\n"));
    assert!(out.contains("typedef qi::Object<Motion> MotionPtr;\n"));
    assert!(out.contains("  virtual bool moveTo(const ::geo::Point& target) = 0;\n"));
    assert!(out.contains("  virtual qi::Future< bool > moveTo(const ::geo::Point& target) = 0;\n"));
    assert!(out.contains("  qi::Signal< ::geo::Point >& moved;\n"));
}

#[test]
fn test_cpp_struct_header() {
    let (out, _) = generate_fixture(Backend::CppInterface, "geo/point.qi");
    assert!(out.contains("struct Point\n{\n  double x;\n  double y;\n};\n"));
}

#[test]
fn test_cpp_local_registers_implementation() {
    let (out, diagnostics) = generate_fixture(Backend::CppLocal, "robot/motion.qi");
    assert!(diagnostics.is_empty());
    assert!(out.contains("class MotionLocalAsync : public MotionAsync\n"));
    assert!(out.contains("#define REGISTER_MOTION(impl__) \\\n"));
    assert!(out.contains("    mmb.appendParameter(\"target\", \"where to go\"); \\\n"));
}

#[test]
fn test_cpp_remote_forwards_by_name() {
    let (out, _) = generate_fixture(Backend::CppRemote, "robot/motion.qi");
    assert!(out.contains("    return _obj.call< bool >(\"moveTo\", target);\n"));
    assert!(out.contains("    _obj.call<void>(\"stop\");\n"));
    assert!(out.contains("QI_REGISTER_PROXY_INTERFACE(MotionRemote, Motion);\n"));
}

#[test]
fn test_cpp_bind_advertises_members() {
    let (out, _) = generate_fixture(Backend::CppBind, "robot/motion.qi");
    assert!(out.contains(
        "  builder.advertiseMethod(\"moveTo\", static_cast< bool(::robot::Motion::*)(const ::geo::Point&) >(&::robot::Motion::moveTo));\n"
    ));
    assert!(out.contains("  builder.advertiseSignal(\"moved\", &::robot::Motion::moved);\n"));
    assert!(out.contains("static int myinittype0 = initType0();\n"));
}

#[test]
fn test_cpp_gmock_snapshot() {
    let (out, _) = generate_fixture(Backend::CppGmock, "robot/motion.qi");
    insta::assert_snapshot!(out, @r#"
    // QiLang-generated file. DO NOT EDIT.
    #pragma once
    #ifndef _QILANG_GEN_GMOCK_ROBOT_MOTION_HPP
    #define _QILANG_GEN_GMOCK_ROBOT_MOTION_HPP

    #include <gmock/gmock.h>
    #include <robot/motion.hpp>

    namespace robot
    {
    namespace gmock
    {
    namespace detail
    {
    template <typename T>
    void registerMotionInTypeBuilder(::qi::ObjectTypeBuilder<T>&& typeBuilder)
    {
      typeBuilder.advertiseMethod("moveTo", static_cast<::qi::Future<bool>(T::*)(const ::geo::Point&)>(&T::moveTo));
      typeBuilder.advertiseMethod("stop", static_cast<::qi::Future<void>(T::*)()>(&T::stop));
      typeBuilder.advertiseSignal("moved", static_cast<::qi::Signal<::geo::Point> T::*>(&T::moved));
      typeBuilder.advertiseProperty("speed", static_cast<::qi::Property<double> T::*>(&T::speed));
      typeBuilder.registerType();
    }
    } // ends namespace detail

    struct MotionGMock;
    using MotionNiceGMock = ::testing::NiceMock<MotionGMock>;
    using MotionStrictGMock = ::testing::StrictMock<MotionGMock>;

    struct MotionGMock
    {
      MotionGMock()
      {
        static bool _typeRegistered_ = []
        {
          detail::registerMotionInTypeBuilder(::qi::ObjectTypeBuilder<MotionGMock>{});
          detail::registerMotionInTypeBuilder(::qi::ObjectTypeBuilder<MotionNiceGMock>{});
          detail::registerMotionInTypeBuilder(::qi::ObjectTypeBuilder<MotionStrictGMock>{});
          return true;
        }();
        QI_UNUSED(_typeRegistered_);
      }

      MOCK_METHOD1(moveTo, ::qi::Future<bool>(const ::geo::Point&));
      MOCK_METHOD0(stop, ::qi::Future<void>());
      qi::Signal<::geo::Point> moved;
      qi::Property<double> speed;
    };

    } // ends namespace gmock
    } // ends namespace robot

    #endif // _QILANG_GEN_GMOCK_ROBOT_MOTION_HPP
    "#);
}

#[test]
fn test_cpp_backends_fail_without_resolution() {
    let mut pm = PackageManager::new();
    let file = pm.parse_file(&fixtures().join("robot/motion.qi")).unwrap();
    let mut diagnostics = DiagnosticManager::new();

    let err = generate(Backend::CppInterface, &pm, &file, &mut diagnostics, CodegenOptions::default()).unwrap_err();
    assert!(err.to_string().contains("type 'Point' was not resolved"));
}
